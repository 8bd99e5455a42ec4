use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::{
        errors::UseCaseError,
        usercases::{streams::StreamUseCase, videos::VideoUseCase},
    },
    domain::{
        repositories::{streams::StreamRepository, videos::VideoRepository},
        value_objects::streams::InsertStreamModel,
    },
    infrastructure::axum_http::{
        error_responses::{AppError, form_error},
        pages::{Page, PageFrame, PageRenderer, platform_options, stream_rows, video_options},
        session::{CurrentUser, FlashKind},
    },
};

pub struct StreamsState<S, V>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    stream_usecase: StreamUseCase<S, V>,
    video_usecase: VideoUseCase<V>,
    pages: Arc<PageRenderer>,
}

pub fn routes<S, V>(
    stream_repository: Arc<S>,
    video_repository: Arc<V>,
    pages: Arc<PageRenderer>,
) -> Router
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    let stream_usecase = StreamUseCase::new(stream_repository, Arc::clone(&video_repository));
    let video_usecase = VideoUseCase::new(video_repository);

    Router::new()
        .route("/", get(streams::<S, V>).post(create::<S, V>))
        .route("/:stream_id/start", post(start::<S, V>))
        .route("/:stream_id/stop", post(stop::<S, V>))
        .route("/:stream_id/delete", post(delete::<S, V>))
        .with_state(Arc::new(StreamsState {
            stream_usecase,
            video_usecase,
            pages,
        }))
}

pub async fn streams<S, V>(
    State(state): State<Arc<StreamsState<S, V>>>,
    current: CurrentUser,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    let html = render_streams(&state, current, &InsertStreamModel::default(), None).await?;
    Ok(html.into_response())
}

pub async fn create<S, V>(
    State(state): State<Arc<StreamsState<S, V>>>,
    current: CurrentUser,
    Form(insert_stream_model): Form<InsertStreamModel>,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    match state
        .stream_usecase
        .create(current.user.id, insert_stream_model.clone())
        .await
    {
        Ok(_) => {
            current.session.flash(FlashKind::Success, "Stream created!");
            Ok(Redirect::to("/streams").into_response())
        }
        Err(err) => failed(&state, current, &insert_stream_model, err).await,
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamAction {
    Start,
    Stop,
    Delete,
}

pub async fn start<S, V>(
    State(state): State<Arc<StreamsState<S, V>>>,
    current: CurrentUser,
    Path(stream_id): Path<i32>,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    apply(&state, current, stream_id, StreamAction::Start).await
}

pub async fn stop<S, V>(
    State(state): State<Arc<StreamsState<S, V>>>,
    current: CurrentUser,
    Path(stream_id): Path<i32>,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    apply(&state, current, stream_id, StreamAction::Stop).await
}

pub async fn delete<S, V>(
    State(state): State<Arc<StreamsState<S, V>>>,
    current: CurrentUser,
    Path(stream_id): Path<i32>,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    apply(&state, current, stream_id, StreamAction::Delete).await
}

async fn apply<S, V>(
    state: &StreamsState<S, V>,
    current: CurrentUser,
    stream_id: i32,
    action: StreamAction,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    let user_id = current.user.id;
    let (result, message) = match action {
        StreamAction::Start => (state.stream_usecase.start(user_id, stream_id).await, "Stream started!"),
        StreamAction::Stop => (state.stream_usecase.stop(user_id, stream_id).await, "Stream stopped!"),
        StreamAction::Delete => (state.stream_usecase.delete(user_id, stream_id).await, "Stream deleted!"),
    };

    match result {
        Ok(()) => {
            current.session.flash(FlashKind::Success, message);
            Ok(Redirect::to("/streams").into_response())
        }
        Err(err) => failed(state, current, &InsertStreamModel::default(), err).await,
    }
}

async fn failed<S, V>(
    state: &StreamsState<S, V>,
    current: CurrentUser,
    form: &InsertStreamModel,
    err: UseCaseError,
) -> Result<Response, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    let (status, message) = form_error(err)?;
    Ok((status, render_streams(state, current, form, Some(message)).await?).into_response())
}

async fn render_streams<S, V>(
    state: &StreamsState<S, V>,
    current: CurrentUser,
    form: &InsertStreamModel,
    error: Option<String>,
) -> Result<Html<String>, AppError>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    let streams = state.stream_usecase.list(current.user.id).await?;
    let videos = state.video_usecase.list(current.user.id).await?;

    let mut frame = PageFrame::new(Some(current.user), current.session.take_flash());
    frame.error = error;

    // The stream key is never echoed back.
    state.pages.render(
        Page::Streams,
        frame,
        json!({
            "form": {
                "title": form.title,
                "scheduled_time": form.scheduled_time,
            },
            "platforms": platform_options(&form.platform),
            "video_options": video_options(&videos, &form.video_id),
            "streams": stream_rows(&streams),
        }),
    )
}
