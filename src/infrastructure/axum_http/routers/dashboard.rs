use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    application::usercases::dashboard::DashboardUseCase,
    domain::repositories::{streams::StreamRepository, videos::VideoRepository},
    infrastructure::axum_http::{
        error_responses::AppError,
        pages::{Page, PageFrame, PageRenderer, stream_rows},
        session::{CurrentUser, SessionHandle},
    },
};

pub struct DashboardState<V, S>
where
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    dashboard_usecase: DashboardUseCase<V, S>,
    pages: Arc<PageRenderer>,
}

pub fn routes<V, S>(
    video_repository: Arc<V>,
    stream_repository: Arc<S>,
    pages: Arc<PageRenderer>,
) -> Router
where
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    let dashboard_usecase = DashboardUseCase::new(video_repository, stream_repository);

    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard::<V, S>))
        .with_state(Arc::new(DashboardState {
            dashboard_usecase,
            pages,
        }))
}

pub async fn index(session: SessionHandle) -> impl IntoResponse {
    if session.user().is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

pub async fn dashboard<V, S>(
    State(state): State<Arc<DashboardState<V, S>>>,
    current: CurrentUser,
) -> Result<Response, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    let summary = state.dashboard_usecase.summary(current.user.id).await?;

    let frame = PageFrame::new(Some(current.user), current.session.take_flash());
    let html = state.pages.render(
        Page::Dashboard,
        frame,
        json!({
            "summary": {
                "total_videos": summary.total_videos,
                "active_streams": summary.active_streams,
                "total_streams": summary.total_streams,
            },
            "streams": stream_rows(&summary.recent_streams),
        }),
    )?;

    Ok(html.into_response())
}
