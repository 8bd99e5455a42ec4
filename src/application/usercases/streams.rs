use chrono::{NaiveDateTime, Utc};
use std::{str::FromStr, sync::Arc};
use tracing::{error, info, warn};

use crate::{
    application::errors::UseCaseError,
    domain::{
        entities::streams::InsertStreamEntity,
        repositories::{streams::StreamRepository, videos::VideoRepository},
        value_objects::{
            enums::{platforms::Platform, stream_statuses::StreamStatus},
            streams::{InsertStreamModel, SCHEDULED_TIME_FORMAT, StreamModel, stream_models},
        },
    },
};

pub struct StreamUseCase<S, V>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    stream_repository: Arc<S>,
    video_repository: Arc<V>,
}

impl<S, V> StreamUseCase<S, V>
where
    S: StreamRepository + Send + Sync + 'static,
    V: VideoRepository + Send + Sync + 'static,
{
    pub fn new(stream_repository: Arc<S>, video_repository: Arc<V>) -> Self {
        Self {
            stream_repository,
            video_repository,
        }
    }

    pub async fn create(
        &self,
        user_id: i32,
        insert_stream_model: InsertStreamModel,
    ) -> Result<StreamModel, UseCaseError> {
        let title = insert_stream_model.title.trim();
        let stream_key = insert_stream_model.stream_key.trim();
        let platform = insert_stream_model.platform.trim();

        if title.is_empty() || platform.is_empty() || stream_key.is_empty() {
            return Err(UseCaseError::MissingRequiredFields);
        }

        let platform = Platform::from_str(platform)
            .map_err(|_| UseCaseError::UnsupportedPlatform(platform.to_string()))?;

        let scheduled_time = parse_scheduled_time(&insert_stream_model.scheduled_time)?;
        let video_id = self
            .resolve_video(user_id, &insert_stream_model.video_id)
            .await?;

        let insert_stream_entity = InsertStreamEntity {
            user_id,
            title: title.to_string(),
            platform: platform.to_string(),
            stream_key: stream_key.to_string(),
            video_id,
            status: StreamStatus::Pending.to_string(),
            scheduled_time,
            created_at: Utc::now().naive_utc(),
        };

        let stream = self
            .stream_repository
            .create(insert_stream_entity)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "streams: failed to create stream");
                err
            })?;

        info!(
            user_id,
            stream_id = stream.id,
            platform = %platform,
            "streams: stream created"
        );
        let stream = StreamModel::try_from(stream).map_err(|err| {
            error!(user_id, error = ?err, "streams: created stream is malformed");
            err
        })?;
        Ok(stream)
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<StreamModel>, UseCaseError> {
        let streams = self.stream_repository.list_by_user(user_id, None).await?;

        let streams = stream_models(streams).map_err(|err| {
            error!(user_id, error = ?err, "streams: stored stream is malformed");
            err
        })?;
        Ok(streams)
    }

    pub async fn start(&self, user_id: i32, stream_id: i32) -> Result<(), UseCaseError> {
        self.set_status(user_id, stream_id, StreamStatus::Active).await
    }

    pub async fn stop(&self, user_id: i32, stream_id: i32) -> Result<(), UseCaseError> {
        self.set_status(user_id, stream_id, StreamStatus::Stopped).await
    }

    pub async fn delete(&self, user_id: i32, stream_id: i32) -> Result<(), UseCaseError> {
        let deleted = self
            .stream_repository
            .delete(user_id, stream_id)
            .await
            .map_err(|err| {
                error!(user_id, stream_id, db_error = ?err, "streams: failed to delete stream");
                err
            })?;

        if !deleted {
            warn!(user_id, stream_id, "streams: delete requested for unknown stream");
            return Err(UseCaseError::StreamNotFound);
        }

        info!(user_id, stream_id, "streams: stream deleted");
        Ok(())
    }

    // No transition rules: any status can follow any other.
    async fn set_status(
        &self,
        user_id: i32,
        stream_id: i32,
        status: StreamStatus,
    ) -> Result<(), UseCaseError> {
        let updated = self
            .stream_repository
            .update_status(user_id, stream_id, status)
            .await
            .map_err(|err| {
                error!(user_id, stream_id, db_error = ?err, "streams: failed to update status");
                err
            })?;

        if !updated {
            warn!(user_id, stream_id, "streams: status change for unknown stream");
            return Err(UseCaseError::StreamNotFound);
        }

        info!(user_id, stream_id, status = %status, "streams: status changed");
        Ok(())
    }

    async fn resolve_video(&self, user_id: i32, raw: &str) -> Result<Option<i32>, UseCaseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let video_id: i32 = raw.parse().map_err(|_| UseCaseError::InvalidVideoSelection)?;

        self.video_repository
            .find_by_id(user_id, video_id)
            .await?
            .map(|video| Some(video.id))
            .ok_or(UseCaseError::InvalidVideoSelection)
    }
}

fn parse_scheduled_time(raw: &str) -> Result<Option<NaiveDateTime>, UseCaseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDateTime::parse_from_str(raw, SCHEDULED_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(Some)
        .map_err(|_| UseCaseError::InvalidScheduledTime)
}
