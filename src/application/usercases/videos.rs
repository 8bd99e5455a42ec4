use chrono::Utc;
use std::{path::Path, sync::Arc};
use tracing::{error, info, warn};

use crate::{
    application::errors::UseCaseError,
    domain::{
        entities::videos::InsertVideoEntity,
        repositories::videos::VideoRepository,
        value_objects::videos::{ALLOWED_VIDEO_EXTENSIONS, UploadedVideoModel, VideoModel},
    },
};

pub struct VideoUseCase<V>
where
    V: VideoRepository + Send + Sync + 'static,
{
    video_repository: Arc<V>,
}

impl<V> VideoUseCase<V>
where
    V: VideoRepository + Send + Sync + 'static,
{
    pub fn new(video_repository: Arc<V>) -> Self {
        Self { video_repository }
    }

    /// Records an upload's metadata. The file itself is not kept; `file_path` only names where it
    /// would have gone.
    pub async fn save_upload(
        &self,
        user_id: i32,
        uploaded: Option<UploadedVideoModel>,
    ) -> Result<VideoModel, UseCaseError> {
        let uploaded = uploaded
            .filter(|u| !u.file_name.trim().is_empty())
            .ok_or(UseCaseError::MissingVideoFile)?;

        let file_name = sanitize_file_name(&uploaded.file_name);
        if !has_allowed_extension(&file_name) {
            warn!(user_id, file_name = %file_name, "videos: rejected upload with unsupported format");
            return Err(UseCaseError::UnsupportedVideoFormat);
        }

        let insert_video_entity = InsertVideoEntity {
            user_id,
            filename: file_name.clone(),
            original_name: file_name.clone(),
            file_path: format!("uploads/{}", file_name),
            file_size: Some(uploaded.file_size),
            created_at: Utc::now().naive_utc(),
        };

        let video = self
            .video_repository
            .create(insert_video_entity)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "videos: failed to save video");
                err
            })?;

        info!(
            user_id,
            video_id = video.id,
            file_size = uploaded.file_size,
            "videos: video saved"
        );
        Ok(VideoModel::from(video))
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<VideoModel>, UseCaseError> {
        let videos = self.video_repository.list_by_user(user_id).await?;

        Ok(videos.into_iter().map(VideoModel::from).collect())
    }

    pub async fn delete(&self, user_id: i32, video_id: i32) -> Result<(), UseCaseError> {
        let deleted = self
            .video_repository
            .delete(user_id, video_id)
            .await
            .map_err(|err| {
                error!(user_id, video_id, db_error = ?err, "videos: failed to delete video");
                err
            })?;

        if !deleted {
            warn!(user_id, video_id, "videos: delete requested for unknown video");
            return Err(UseCaseError::VideoNotFound);
        }

        info!(user_id, video_id, "videos: video deleted");
        Ok(())
    }
}

// Browsers may send a full client path; keep only the last component.
fn sanitize_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim().to_string()
}

fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_VIDEO_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
