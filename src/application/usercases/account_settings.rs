use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    application::errors::UseCaseError,
    auth::{MIN_PASSWORD_LENGTH, PasswordHasher},
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{ChangePasswordModel, UserModel},
    },
};

pub struct AccountSettingsUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    password_hasher: PasswordHasher,
}

impl<U> AccountSettingsUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>, password_hasher: PasswordHasher) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn profile(&self, user_id: i32) -> Result<UserModel, UseCaseError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UseCaseError::UserNotFound)?;

        Ok(UserModel::from(user))
    }

    pub async fn change_password(
        &self,
        user_id: i32,
        change_password_model: ChangePasswordModel,
    ) -> Result<(), UseCaseError> {
        let ChangePasswordModel {
            current_password,
            new_password,
            confirm_password,
        } = change_password_model;

        if current_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
            return Err(UseCaseError::MissingFields);
        }

        if new_password != confirm_password {
            return Err(UseCaseError::PasswordMismatch);
        }

        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UseCaseError::PasswordTooShort);
        }

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "account_settings: failed to load user");
                err
            })?
            .ok_or(UseCaseError::UserNotFound)?;

        if !self
            .password_hasher
            .verify(&current_password, &user.password_hash)?
        {
            warn!(user_id, "account_settings: current password mismatch");
            return Err(UseCaseError::WrongCurrentPassword);
        }

        let password_hash = self.password_hasher.hash(&new_password)?;

        let updated = self
            .user_repository
            .update_password_hash(user_id, password_hash)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "account_settings: failed to update password");
                err
            })?;

        if !updated {
            return Err(UseCaseError::UserNotFound);
        }

        info!(user_id, "account_settings: password changed");
        Ok(())
    }
}
