use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::streams::StreamEntity,
    value_objects::enums::{platforms::Platform, stream_statuses::StreamStatus},
};

/// Format produced by `<input type="datetime-local">`.
pub const SCHEDULED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamModel {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub platform: Platform,
    pub video_id: Option<i32>,
    pub status: StreamStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fails on a row whose platform or status is not one the pages know.
impl TryFrom<StreamEntity> for StreamModel {
    type Error = anyhow::Error;

    fn try_from(entity: StreamEntity) -> Result<Self> {
        let platform = entity
            .platform
            .parse::<Platform>()
            .map_err(|err| anyhow!("stream {}: {}", entity.id, err))?;
        let status = entity
            .status
            .parse::<StreamStatus>()
            .map_err(|err| anyhow!("stream {}: {}", entity.id, err))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            platform,
            video_id: entity.video_id,
            status,
            scheduled_time: entity.scheduled_time.map(|t| t.and_utc()),
            created_at: entity.created_at.and_utc(),
        })
    }
}

/// Converts a page of rows; one malformed row fails the whole list.
pub fn stream_models(entities: Vec<StreamEntity>) -> Result<Vec<StreamModel>> {
    entities.into_iter().map(StreamModel::try_from).collect()
}

/// Raw stream form. Empty strings mean the field was left blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertStreamModel {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub stream_key: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub scheduled_time: String,
}
