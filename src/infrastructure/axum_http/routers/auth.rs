use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usercases::authentication::AuthenticationUseCase,
    auth::{MIN_PASSWORD_LENGTH, PasswordHasher},
    config::config_model::DemoAccount,
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel},
    },
    infrastructure::axum_http::{
        error_responses::{AppError, form_error},
        pages::{Page, PageFrame, PageRenderer},
        session::{FlashKind, SessionHandle},
    },
};

pub struct AuthState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    authentication_usecase: AuthenticationUseCase<U>,
    pages: Arc<PageRenderer>,
    demo_account: Option<DemoAccount>,
}

pub fn routes<U>(
    user_repository: Arc<U>,
    password_hasher: PasswordHasher,
    pages: Arc<PageRenderer>,
    demo_account: Option<DemoAccount>,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    let authentication_usecase = AuthenticationUseCase::new(user_repository, password_hasher);

    Router::new()
        .route("/login", get(login_page::<U>).post(login::<U>))
        .route("/register", get(register_page::<U>).post(register::<U>))
        .route("/logout", post(logout))
        .with_state(Arc::new(AuthState {
            authentication_usecase,
            pages,
            demo_account,
        }))
}

pub async fn login_page<U>(
    State(state): State<Arc<AuthState<U>>>,
    session: SessionHandle,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    if session.user().is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let frame = PageFrame::new(None, session.take_flash());
    Ok(render_login(&state, frame, "")?.into_response())
}

pub async fn login<U>(
    State(state): State<Arc<AuthState<U>>>,
    session: SessionHandle,
    Form(login_model): Form<LoginModel>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let username = login_model.username.clone();

    match state.authentication_usecase.login(login_model).await {
        Ok(user) => {
            session.sign_in(user);
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(err) => {
            let (status, message) = form_error(err)?;
            let frame = PageFrame::default().with_error(message);
            Ok((status, render_login(&state, frame, &username)?).into_response())
        }
    }
}

pub async fn register_page<U>(
    State(state): State<Arc<AuthState<U>>>,
    session: SessionHandle,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    if session.user().is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let frame = PageFrame::new(None, session.take_flash());
    Ok(render_register(&state, frame, "", "")?.into_response())
}

pub async fn register<U>(
    State(state): State<Arc<AuthState<U>>>,
    session: SessionHandle,
    Form(register_model): Form<RegisterUserModel>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let (username, email) = (register_model.username.clone(), register_model.email.clone());

    match state.authentication_usecase.register(register_model).await {
        Ok(_) => {
            session.flash(FlashKind::Success, "Account created! Please log in.");
            Ok(Redirect::to("/login").into_response())
        }
        Err(err) => {
            let (status, message) = form_error(err)?;
            let frame = PageFrame::default().with_error(message);
            Ok((status, render_register(&state, frame, &username, &email)?).into_response())
        }
    }
}

pub async fn logout(session: SessionHandle) -> impl IntoResponse {
    session.sign_out();
    Redirect::to("/login")
}

fn render_login<U>(
    state: &AuthState<U>,
    frame: PageFrame,
    username: &str,
) -> Result<axum::response::Html<String>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let demo = state.demo_account.as_ref().map(|demo| {
        json!({
            "username": demo.username,
            "password": demo.password,
        })
    });

    state.pages.render(
        Page::Login,
        frame,
        json!({
            "username": username,
            "demo": demo,
        }),
    )
}

fn render_register<U>(
    state: &AuthState<U>,
    frame: PageFrame,
    username: &str,
    email: &str,
) -> Result<axum::response::Html<String>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    state.pages.render(
        Page::Register,
        frame,
        json!({
            "username": username,
            "email": email,
            "min_password_length": MIN_PASSWORD_LENGTH,
        }),
    )
}
