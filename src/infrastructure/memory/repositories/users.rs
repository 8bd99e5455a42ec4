use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        entities::users::{InsertUserEntity, UserEntity},
        repositories::users::UserRepository,
    },
    infrastructure::memory::memory_store::MemoryStore,
};

pub struct UserMemory {
    store: Arc<MemoryStore>,
}

impl UserMemory {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for UserMemory {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Option<UserEntity>> {
        let result = self.store.write(|tables| {
            if tables.username_index.contains_key(&insert_user_entity.username)
                || tables.email_index.contains_key(&insert_user_entity.email)
            {
                return None;
            }

            let user = UserEntity {
                id: tables.next_user_id(),
                username: insert_user_entity.username,
                email: insert_user_entity.email,
                password_hash: insert_user_entity.password_hash,
                avatar_path: None,
                created_at: insert_user_entity.created_at,
            };

            tables.username_index.insert(user.username.clone(), user.id);
            tables.email_index.insert(user.email.clone(), user.id);
            tables.users.insert(user.id, user.clone());
            Some(user)
        });

        Ok(result)
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<UserEntity>> {
        Ok(self.store.read(|tables| tables.users.get(&user_id).cloned()))
    }

    async fn find_by_username(&self, username: String) -> Result<Option<UserEntity>> {
        let result = self.store.read(|tables| {
            tables
                .username_index
                .get(&username)
                .and_then(|id| tables.users.get(id))
                .cloned()
        });

        Ok(result)
    }

    async fn update_password_hash(&self, user_id: i32, password_hash: String) -> Result<bool> {
        let updated = self.store.write(|tables| match tables.users.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash;
                true
            }
            None => false,
        });

        Ok(updated)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.store.read(|tables| tables.users.len() as i64))
    }
}
