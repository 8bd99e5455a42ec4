use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, dsl::count_star, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::videos::{InsertVideoEntity, VideoEntity},
        repositories::videos::VideoRepository,
    },
    infrastructure::sqlite::{schema::videos, sqlite_connection::SqlitePoolSquad},
};

pub struct VideoSqlite {
    db_pool: Arc<SqlitePoolSquad>,
}

impl VideoSqlite {
    pub fn new(db_pool: Arc<SqlitePoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VideoRepository for VideoSqlite {
    async fn create(&self, insert_video_entity: InsertVideoEntity) -> Result<VideoEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(videos::table)
            .values(&insert_video_entity)
            .returning(VideoEntity::as_returning())
            .get_result::<VideoEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = videos::table
            .filter(videos::user_id.eq(user_id))
            .order((videos::created_at.desc(), videos::id.desc()))
            .select(VideoEntity::as_select())
            .load::<VideoEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, user_id: i32, video_id: i32) -> Result<Option<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = videos::table
            .filter(videos::id.eq(video_id))
            .filter(videos::user_id.eq(user_id))
            .select(VideoEntity::as_select())
            .first::<VideoEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, user_id: i32, video_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(
            videos::table
                .filter(videos::id.eq(video_id))
                .filter(videos::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn count_by_user(&self, user_id: i32) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = videos::table
            .filter(videos::user_id.eq(user_id))
            .select(count_star())
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }
}
