use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::videos::VideoEntity;

pub const ALLOWED_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoModel {
    pub id: i32,
    pub user_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoEntity> for VideoModel {
    fn from(entity: VideoEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            filename: entity.filename,
            original_name: entity.original_name,
            file_path: entity.file_path,
            file_size: entity.file_size,
            created_at: entity.created_at.and_utc(),
        }
    }
}

/// What is kept of an upload once its bytes have been counted and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedVideoModel {
    pub file_name: String,
    pub file_size: i64,
}
