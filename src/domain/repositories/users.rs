use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[async_trait]
#[automock]
pub trait UserRepository {
    /// Inserts the user unless the username or email is already taken, in which case nothing is
    /// written and `None` comes back. The check and the insert are atomic.
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Option<UserEntity>>;
    async fn find_by_id(&self, user_id: i32) -> Result<Option<UserEntity>>;
    async fn find_by_username(&self, username: String) -> Result<Option<UserEntity>>;
    async fn update_password_hash(&self, user_id: i32, password_hash: String) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}
