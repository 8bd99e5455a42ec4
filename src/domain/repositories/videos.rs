use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::videos::{InsertVideoEntity, VideoEntity};

#[async_trait]
#[automock]
pub trait VideoRepository {
    async fn create(&self, insert_video_entity: InsertVideoEntity) -> Result<VideoEntity>;
    /// Newest first.
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<VideoEntity>>;
    async fn find_by_id(&self, user_id: i32, video_id: i32) -> Result<Option<VideoEntity>>;
    async fn delete(&self, user_id: i32, video_id: i32) -> Result<bool>;
    async fn count_by_user(&self, user_id: i32) -> Result<i64>;
}
