use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::streams::{InsertStreamEntity, StreamEntity},
    value_objects::enums::stream_statuses::StreamStatus,
};

#[async_trait]
#[automock]
pub trait StreamRepository {
    async fn create(&self, insert_stream_entity: InsertStreamEntity) -> Result<StreamEntity>;
    /// Newest first, optionally capped at `limit` rows.
    async fn list_by_user(&self, user_id: i32, limit: Option<i64>) -> Result<Vec<StreamEntity>>;
    async fn update_status(&self, user_id: i32, stream_id: i32, status: StreamStatus)
    -> Result<bool>;
    async fn delete(&self, user_id: i32, stream_id: i32) -> Result<bool>;
    async fn count_by_user(&self, user_id: i32, status: Option<StreamStatus>) -> Result<i64>;
}
