use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usercases::account_settings::AccountSettingsUseCase,
    auth::{MIN_PASSWORD_LENGTH, PasswordHasher},
    domain::{repositories::users::UserRepository, value_objects::users::ChangePasswordModel},
    infrastructure::axum_http::{
        error_responses::{AppError, form_error},
        pages::{Page, PageFrame, PageRenderer},
        session::{CurrentUser, FlashKind},
    },
};

pub struct SettingsState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    account_settings_usecase: AccountSettingsUseCase<U>,
    pages: Arc<PageRenderer>,
}

pub fn routes<U>(
    user_repository: Arc<U>,
    password_hasher: PasswordHasher,
    pages: Arc<PageRenderer>,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    let account_settings_usecase = AccountSettingsUseCase::new(user_repository, password_hasher);

    Router::new()
        .route("/", get(settings::<U>))
        .route("/password", post(change_password::<U>))
        .with_state(Arc::new(SettingsState {
            account_settings_usecase,
            pages,
        }))
}

pub async fn settings<U>(
    State(state): State<Arc<SettingsState<U>>>,
    current: CurrentUser,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    Ok(render_settings(&state, current, None).await?.into_response())
}

pub async fn change_password<U>(
    State(state): State<Arc<SettingsState<U>>>,
    current: CurrentUser,
    Form(change_password_model): Form<ChangePasswordModel>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    match state
        .account_settings_usecase
        .change_password(current.user.id, change_password_model)
        .await
    {
        Ok(()) => {
            current.session.flash(FlashKind::Success, "Password changed!");
            Ok(Redirect::to("/settings").into_response())
        }
        Err(err) => {
            let (status, message) = form_error(err)?;
            Ok((status, render_settings(&state, current, Some(message)).await?).into_response())
        }
    }
}

async fn render_settings<U>(
    state: &SettingsState<U>,
    current: CurrentUser,
    error: Option<String>,
) -> Result<Html<String>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let profile = state.account_settings_usecase.profile(current.user.id).await?;
    let member_since = profile.created_at.format("%Y-%m-%d").to_string();

    let mut frame = PageFrame::new(Some(current.user), current.session.take_flash());
    frame.error = error;

    state.pages.render(
        Page::Settings,
        frame,
        json!({
            "profile": profile,
            "member_since": member_since,
            "min_password_length": MIN_PASSWORD_LENGTH,
        }),
    )
}
