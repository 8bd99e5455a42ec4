use std::sync::Arc;
use tracing::error;

use crate::{
    application::errors::UseCaseError,
    domain::{
        repositories::{streams::StreamRepository, videos::VideoRepository},
        value_objects::{
            dashboard::{DashboardModel, RECENT_STREAMS_LIMIT},
            enums::stream_statuses::StreamStatus,
            streams::stream_models,
        },
    },
};

pub struct DashboardUseCase<V, S>
where
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    video_repository: Arc<V>,
    stream_repository: Arc<S>,
}

impl<V, S> DashboardUseCase<V, S>
where
    V: VideoRepository + Send + Sync + 'static,
    S: StreamRepository + Send + Sync + 'static,
{
    pub fn new(video_repository: Arc<V>, stream_repository: Arc<S>) -> Self {
        Self {
            video_repository,
            stream_repository,
        }
    }

    pub async fn summary(&self, user_id: i32) -> Result<DashboardModel, UseCaseError> {
        let total_videos = self.video_repository.count_by_user(user_id).await?;
        let active_streams = self
            .stream_repository
            .count_by_user(user_id, Some(StreamStatus::Active))
            .await?;
        let total_streams = self.stream_repository.count_by_user(user_id, None).await?;
        let recent_streams = self
            .stream_repository
            .list_by_user(user_id, Some(RECENT_STREAMS_LIMIT))
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "dashboard: failed to load recent streams");
                err
            })?;

        let recent_streams = stream_models(recent_streams).map_err(|err| {
            error!(user_id, error = ?err, "dashboard: stored stream is malformed");
            err
        })?;

        Ok(DashboardModel {
            total_videos,
            active_streams,
            total_streams,
            recent_streams,
        })
    }
}
