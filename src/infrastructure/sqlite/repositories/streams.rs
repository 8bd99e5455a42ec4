use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, dsl::count_star, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain::{
        entities::streams::{InsertStreamEntity, StreamEntity},
        repositories::streams::StreamRepository,
        value_objects::enums::stream_statuses::StreamStatus,
    },
    infrastructure::sqlite::{schema::streams, sqlite_connection::SqlitePoolSquad},
};

pub struct StreamSqlite {
    db_pool: Arc<SqlitePoolSquad>,
}

impl StreamSqlite {
    pub fn new(db_pool: Arc<SqlitePoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl StreamRepository for StreamSqlite {
    async fn create(&self, insert_stream_entity: InsertStreamEntity) -> Result<StreamEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(streams::table)
            .values(&insert_stream_entity)
            .returning(StreamEntity::as_returning())
            .get_result::<StreamEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: i32, limit: Option<i64>) -> Result<Vec<StreamEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = streams::table
            .filter(streams::user_id.eq(user_id))
            .order((streams::created_at.desc(), streams::id.desc()))
            .select(StreamEntity::as_select())
            .into_boxed();

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let results = query.load::<StreamEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_status(
        &self,
        user_id: i32,
        stream_id: i32,
        status: StreamStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(streams::table)
            .filter(streams::id.eq(stream_id))
            .filter(streams::user_id.eq(user_id))
            .set(streams::status.eq(status.to_string()))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn delete(&self, user_id: i32, stream_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(
            streams::table
                .filter(streams::id.eq(stream_id))
                .filter(streams::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn count_by_user(&self, user_id: i32, status: Option<StreamStatus>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = streams::table
            .filter(streams::user_id.eq(user_id))
            .select(count_star())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(streams::status.eq(status.to_string()));
        }

        let result = query.get_result::<i64>(&mut conn)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            entities::{users::InsertUserEntity, videos::InsertVideoEntity},
            repositories::{users::UserRepository, videos::VideoRepository},
        },
        infrastructure::sqlite::{
            repositories::{users::UserSqlite, videos::VideoSqlite},
            sqlite_connection::{SqlitePoolSquad, establish_connection},
        },
    };
    use chrono::{Duration, Utc};

    async fn setup() -> (Arc<SqlitePoolSquad>, StreamSqlite, i32) {
        let pool = Arc::new(establish_connection(":memory:", 1).unwrap());
        let user = UserSqlite::new(Arc::clone(&pool))
            .create(InsertUserEntity {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "a".repeat(64),
                created_at: Utc::now().naive_utc(),
            })
            .await
            .unwrap()
            .unwrap();
        let repository = StreamSqlite::new(Arc::clone(&pool));
        (pool, repository, user.id)
    }

    fn insert(user_id: i32, title: &str, age_minutes: i64) -> InsertStreamEntity {
        InsertStreamEntity {
            user_id,
            title: title.to_string(),
            platform: "YouTube".to_string(),
            stream_key: "abc123".to_string(),
            video_id: None,
            status: StreamStatus::Pending.to_string(),
            scheduled_time: None,
            created_at: (Utc::now() - Duration::minutes(age_minutes)).naive_utc(),
        }
    }

    #[tokio::test]
    async fn start_then_stop_updates_status() {
        let (_, repository, user_id) = setup().await;
        let stream = repository.create(insert(user_id, "Launch", 0)).await.unwrap();
        assert_eq!(stream.status, "pending");

        assert!(
            repository
                .update_status(user_id, stream.id, StreamStatus::Active)
                .await
                .unwrap()
        );
        assert_eq!(
            repository.count_by_user(user_id, Some(StreamStatus::Active)).await.unwrap(),
            1
        );

        repository
            .update_status(user_id, stream.id, StreamStatus::Stopped)
            .await
            .unwrap();
        let streams = repository.list_by_user(user_id, None).await.unwrap();
        assert_eq!(streams[0].status, "stopped");
    }

    #[tokio::test]
    async fn list_respects_limit_and_order() {
        let (_, repository, user_id) = setup().await;
        for minutes in 0..7 {
            repository
                .create(insert(user_id, &format!("stream-{}", minutes), minutes))
                .await
                .unwrap();
        }

        let recent = repository.list_by_user(user_id, Some(5)).await.unwrap();

        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "stream-0");
        assert_eq!(recent[4].title, "stream-4");
        assert_eq!(repository.count_by_user(user_id, None).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn deleting_a_video_keeps_streams_that_reference_it() {
        let (pool, repository, user_id) = setup().await;
        let videos = VideoSqlite::new(Arc::clone(&pool));
        let video = videos
            .create(InsertVideoEntity {
                user_id,
                filename: "intro.mp4".to_string(),
                original_name: "intro.mp4".to_string(),
                file_path: "uploads/intro.mp4".to_string(),
                file_size: Some(10),
                created_at: Utc::now().naive_utc(),
            })
            .await
            .unwrap();
        let mut stream = insert(user_id, "With video", 0);
        stream.video_id = Some(video.id);
        let stream = repository.create(stream).await.unwrap();

        assert!(videos.delete(user_id, video.id).await.unwrap());

        let streams = repository.list_by_user(user_id, None).await.unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].id, stream.id);
        assert_eq!(streams[0].video_id, Some(video.id));
    }

    #[tokio::test]
    async fn delete_ignores_status() {
        let (_, repository, user_id) = setup().await;
        let stream = repository.create(insert(user_id, "Live", 0)).await.unwrap();
        repository
            .update_status(user_id, stream.id, StreamStatus::Active)
            .await
            .unwrap();

        assert!(repository.delete(user_id, stream.id).await.unwrap());
        assert!(!repository.delete(user_id, stream.id).await.unwrap());
        assert_eq!(repository.count_by_user(user_id, None).await.unwrap(), 0);
    }
}
