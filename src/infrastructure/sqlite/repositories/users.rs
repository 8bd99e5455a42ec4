use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use std::sync::Arc;

use crate::{
    domain::{
        entities::users::{InsertUserEntity, UserEntity},
        repositories::users::UserRepository,
    },
    infrastructure::sqlite::{schema::users, sqlite_connection::SqlitePoolSquad},
};

pub struct UserSqlite {
    db_pool: Arc<SqlitePoolSquad>,
}

impl UserSqlite {
    pub fn new(db_pool: Arc<SqlitePoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserSqlite {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&insert_user_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::id.eq(user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_username(&self, username: String) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::username.eq(username))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_password_hash(&self, user_id: i32, password_hash: String) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(users::table)
            .filter(users::id.eq(user_id))
            .set(users::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table.count().get_result::<i64>(&mut conn)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::sqlite_connection::establish_connection;
    use chrono::Utc;

    fn repository() -> UserSqlite {
        let pool = establish_connection(":memory:", 1).unwrap();
        UserSqlite::new(Arc::new(pool))
    }

    fn insert(username: &str, email: &str) -> InsertUserEntity {
        InsertUserEntity {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "a".repeat(64),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let repository = repository();

        let first = repository.create(insert("alice", "alice@example.com")).await.unwrap().unwrap();
        let second = repository.create(insert("bob", "bob@example.com")).await.unwrap().unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_not_inserted() {
        let repository = repository();
        repository.create(insert("alice", "alice@example.com")).await.unwrap();

        let same_username = repository.create(insert("alice", "other@example.com")).await.unwrap();
        let same_email = repository.create(insert("alicia", "alice@example.com")).await.unwrap();

        assert!(same_username.is_none());
        assert!(same_email.is_none());
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn finds_and_updates_password_hash() {
        let repository = repository();
        let user = repository.create(insert("alice", "alice@example.com")).await.unwrap().unwrap();

        let updated = repository
            .update_password_hash(user.id, "b".repeat(64))
            .await
            .unwrap();
        let found = repository
            .find_by_username("alice".to_string())
            .await
            .unwrap()
            .unwrap();

        assert!(updated);
        assert_eq!(found.password_hash, "b".repeat(64));
        assert!(!repository.update_password_hash(99, "c".repeat(64)).await.unwrap());
        assert!(repository.find_by_id(99).await.unwrap().is_none());
    }
}
