use anyhow::Result;
use async_trait::async_trait;
use std::{cmp::Reverse, sync::Arc};

use crate::{
    domain::{
        entities::videos::{InsertVideoEntity, VideoEntity},
        repositories::videos::VideoRepository,
    },
    infrastructure::memory::memory_store::MemoryStore,
};

pub struct VideoMemory {
    store: Arc<MemoryStore>,
}

impl VideoMemory {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VideoRepository for VideoMemory {
    async fn create(&self, insert_video_entity: InsertVideoEntity) -> Result<VideoEntity> {
        let video = self.store.write(|tables| {
            let video = VideoEntity {
                id: tables.next_video_id(),
                user_id: insert_video_entity.user_id,
                filename: insert_video_entity.filename,
                original_name: insert_video_entity.original_name,
                file_path: insert_video_entity.file_path,
                thumbnail_path: None,
                duration: None,
                file_size: insert_video_entity.file_size,
                created_at: insert_video_entity.created_at,
            };
            tables.videos.insert(video.id, video.clone());
            video
        });

        Ok(video)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<VideoEntity>> {
        let mut videos: Vec<VideoEntity> = self.store.read(|tables| {
            tables
                .videos
                .values()
                .filter(|v| v.user_id == user_id)
                .cloned()
                .collect()
        });
        videos.sort_by_key(|v| Reverse((v.created_at, v.id)));

        Ok(videos)
    }

    async fn find_by_id(&self, user_id: i32, video_id: i32) -> Result<Option<VideoEntity>> {
        let result = self.store.read(|tables| {
            tables
                .videos
                .get(&video_id)
                .filter(|v| v.user_id == user_id)
                .cloned()
        });

        Ok(result)
    }

    async fn delete(&self, user_id: i32, video_id: i32) -> Result<bool> {
        let deleted = self.store.write(|tables| {
            let owned = tables
                .videos
                .get(&video_id)
                .is_some_and(|v| v.user_id == user_id);
            owned && tables.videos.remove(&video_id).is_some()
        });

        Ok(deleted)
    }

    async fn count_by_user(&self, user_id: i32) -> Result<i64> {
        let count = self.store.read(|tables| {
            tables.videos.values().filter(|v| v.user_id == user_id).count()
        });

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn insert(user_id: i32, name: &str, age_minutes: i64) -> InsertVideoEntity {
        InsertVideoEntity {
            user_id,
            filename: name.to_string(),
            original_name: name.to_string(),
            file_path: format!("uploads/{}", name),
            file_size: Some(2048),
            created_at: (Utc::now() - Duration::minutes(age_minutes)).naive_utc(),
        }
    }

    #[tokio::test]
    async fn delete_removes_exactly_that_video() {
        let repository = VideoMemory::new(Arc::new(MemoryStore::new()));
        let first = repository.create(insert(1, "a.mp4", 3)).await.unwrap();
        let second = repository.create(insert(1, "b.mp4", 2)).await.unwrap();
        let third = repository.create(insert(1, "c.mp4", 1)).await.unwrap();

        assert!(repository.delete(1, second.id).await.unwrap());

        let remaining = repository.list_by_user(1).await.unwrap();
        assert_eq!(remaining, vec![third, first]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repository = VideoMemory::new(Arc::new(MemoryStore::new()));
        let first = repository.create(insert(1, "a.mp4", 0)).await.unwrap();
        repository.delete(1, first.id).await.unwrap();

        let next = repository.create(insert(1, "b.mp4", 0)).await.unwrap();

        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn other_users_cannot_delete() {
        let repository = VideoMemory::new(Arc::new(MemoryStore::new()));
        let video = repository.create(insert(1, "a.mp4", 0)).await.unwrap();

        assert!(!repository.delete(2, video.id).await.unwrap());
        assert_eq!(repository.count_by_user(1).await.unwrap(), 1);
        assert!(repository.find_by_id(2, video.id).await.unwrap().is_none());
    }
}
