use anyhow::Result;
use async_trait::async_trait;
use std::{cmp::Reverse, sync::Arc};

use crate::{
    domain::{
        entities::streams::{InsertStreamEntity, StreamEntity},
        repositories::streams::StreamRepository,
        value_objects::enums::stream_statuses::StreamStatus,
    },
    infrastructure::memory::memory_store::MemoryStore,
};

pub struct StreamMemory {
    store: Arc<MemoryStore>,
}

impl StreamMemory {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StreamRepository for StreamMemory {
    async fn create(&self, insert_stream_entity: InsertStreamEntity) -> Result<StreamEntity> {
        let stream = self.store.write(|tables| {
            let stream = StreamEntity {
                id: tables.next_stream_id(),
                user_id: insert_stream_entity.user_id,
                title: insert_stream_entity.title,
                platform: insert_stream_entity.platform,
                stream_key: insert_stream_entity.stream_key,
                video_id: insert_stream_entity.video_id,
                status: insert_stream_entity.status,
                scheduled_time: insert_stream_entity.scheduled_time,
                created_at: insert_stream_entity.created_at,
            };
            tables.streams.insert(stream.id, stream.clone());
            stream
        });

        Ok(stream)
    }

    async fn list_by_user(&self, user_id: i32, limit: Option<i64>) -> Result<Vec<StreamEntity>> {
        let mut streams: Vec<StreamEntity> = self.store.read(|tables| {
            tables
                .streams
                .values()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect()
        });
        streams.sort_by_key(|s| Reverse((s.created_at, s.id)));

        if let Some(limit) = limit {
            streams.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }

        Ok(streams)
    }

    async fn update_status(
        &self,
        user_id: i32,
        stream_id: i32,
        status: StreamStatus,
    ) -> Result<bool> {
        let updated = self.store.write(|tables| {
            match tables
                .streams
                .get_mut(&stream_id)
                .filter(|s| s.user_id == user_id)
            {
                Some(stream) => {
                    stream.status = status.to_string();
                    true
                }
                None => false,
            }
        });

        Ok(updated)
    }

    async fn delete(&self, user_id: i32, stream_id: i32) -> Result<bool> {
        let deleted = self.store.write(|tables| {
            let owned = tables
                .streams
                .get(&stream_id)
                .is_some_and(|s| s.user_id == user_id);
            owned && tables.streams.remove(&stream_id).is_some()
        });

        Ok(deleted)
    }

    async fn count_by_user(&self, user_id: i32, status: Option<StreamStatus>) -> Result<i64> {
        let status = status.map(|s| s.to_string());
        let count = self.store.read(|tables| {
            tables
                .streams
                .values()
                .filter(|s| s.user_id == user_id)
                .filter(|s| status.as_ref().is_none_or(|wanted| &s.status == wanted))
                .count()
        });

        Ok(count as i64)
    }
}
