use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::debug;

use crate::{
    application::{errors::UseCaseError, usercases::videos::VideoUseCase},
    domain::{
        repositories::videos::VideoRepository,
        value_objects::videos::{ALLOWED_VIDEO_EXTENSIONS, UploadedVideoModel},
    },
    infrastructure::axum_http::{
        error_responses::{AppError, form_error},
        pages::{Page, PageFrame, PageRenderer, video_rows},
        session::{CurrentUser, FlashKind},
    },
};

/// Multipart field carrying the file.
const VIDEO_FIELD: &str = "video";

pub struct GalleryState<V>
where
    V: VideoRepository + Send + Sync + 'static,
{
    video_usecase: VideoUseCase<V>,
    pages: Arc<PageRenderer>,
}

pub fn routes<V>(video_repository: Arc<V>, pages: Arc<PageRenderer>) -> Router
where
    V: VideoRepository + Send + Sync + 'static,
{
    let video_usecase = VideoUseCase::new(video_repository);

    Router::new()
        .route("/", get(gallery::<V>))
        .route("/upload", post(upload::<V>))
        .route("/:video_id/delete", post(delete::<V>))
        .with_state(Arc::new(GalleryState {
            video_usecase,
            pages,
        }))
}

pub async fn gallery<V>(
    State(state): State<Arc<GalleryState<V>>>,
    current: CurrentUser,
) -> Result<Response, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
{
    Ok(render_gallery(&state, current, None).await?.into_response())
}

pub async fn upload<V>(
    State(state): State<Arc<GalleryState<V>>>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
{
    let uploaded = read_video_field(&mut multipart).await?;

    match state.video_usecase.save_upload(current.user.id, uploaded).await {
        Ok(video) => {
            current.session.flash(
                FlashKind::Success,
                format!("Video \"{}\" uploaded!", video.original_name),
            );
            Ok(Redirect::to("/gallery").into_response())
        }
        Err(err) => failed(&state, current, err).await,
    }
}

pub async fn delete<V>(
    State(state): State<Arc<GalleryState<V>>>,
    current: CurrentUser,
    Path(video_id): Path<i32>,
) -> Result<Response, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
{
    match state.video_usecase.delete(current.user.id, video_id).await {
        Ok(()) => {
            current.session.flash(FlashKind::Success, "Video deleted!");
            Ok(Redirect::to("/gallery").into_response())
        }
        Err(err) => failed(&state, current, err).await,
    }
}

/// Counts the bytes of the `video` field without keeping them.
async fn read_video_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedVideoModel>, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mut file_size: i64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?
        {
            file_size += chunk.len() as i64;
        }

        debug!(file_name = %file_name, file_size, "gallery: upload received");
        return Ok(Some(UploadedVideoModel {
            file_name,
            file_size,
        }));
    }

    Ok(None)
}

async fn failed<V>(
    state: &GalleryState<V>,
    current: CurrentUser,
    err: UseCaseError,
) -> Result<Response, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
{
    let (status, message) = form_error(err)?;
    Ok((status, render_gallery(state, current, Some(message)).await?).into_response())
}

async fn render_gallery<V>(
    state: &GalleryState<V>,
    current: CurrentUser,
    error: Option<String>,
) -> Result<Html<String>, AppError>
where
    V: VideoRepository + Send + Sync + 'static,
{
    let videos = state.video_usecase.list(current.user.id).await?;

    let mut frame = PageFrame::new(Some(current.user), current.session.take_flash());
    frame.error = error;

    state.pages.render(
        Page::Gallery,
        frame,
        json!({
            "videos": video_rows(&videos),
            "allowed_extensions": ALLOWED_VIDEO_EXTENSIONS.join(", "),
        }),
    )
}
