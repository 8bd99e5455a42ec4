use anyhow::Result as AnyResult;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{
    application::errors::UseCaseError,
    auth::{MIN_PASSWORD_LENGTH, PasswordHasher},
    config::config_model::DemoAccount,
    domain::{
        entities::users::InsertUserEntity,
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel, UserModel},
    },
};

pub struct AuthenticationUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    password_hasher: PasswordHasher,
}

impl<U> AuthenticationUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>, password_hasher: PasswordHasher) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn register(&self, register_model: RegisterUserModel) -> Result<UserModel, UseCaseError> {
        let username = register_model.username.trim();
        let email = register_model.email.trim();

        if username.is_empty()
            || email.is_empty()
            || register_model.password.is_empty()
            || register_model.confirm_password.is_empty()
        {
            return Err(UseCaseError::MissingFields);
        }

        if register_model.password != register_model.confirm_password {
            return Err(UseCaseError::PasswordMismatch);
        }

        if register_model.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UseCaseError::PasswordTooShort);
        }

        let password_hash = self.password_hasher.hash(&register_model.password)?;

        let insert_user_entity = InsertUserEntity {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now().naive_utc(),
        };

        let user = self
            .user_repository
            .create(insert_user_entity)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "authentication: failed to insert user");
                err
            })?
            .ok_or_else(|| {
                warn!(username, "authentication: username or email already taken");
                UseCaseError::UsernameOrEmailTaken
            })?;

        info!(user_id = user.id, "authentication: user registered");
        Ok(UserModel::from(user))
    }

    pub async fn login(&self, login_model: LoginModel) -> Result<UserModel, UseCaseError> {
        let username = login_model.username.trim();

        if username.is_empty() || login_model.password.is_empty() {
            return Err(UseCaseError::MissingCredentials);
        }

        let Some(user) = self
            .user_repository
            .find_by_username(username.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "authentication: failed to look up user");
                err
            })?
        else {
            debug!("authentication: unknown username");
            return Err(UseCaseError::InvalidCredentials);
        };

        let verified = self
            .password_hasher
            .verify(&login_model.password, &user.password_hash)
            .map_err(|err| {
                error!(user_id = user.id, error = ?err, "authentication: stored hash is unusable");
                err
            })?;

        if !verified {
            warn!(user_id = user.id, "authentication: wrong password");
            return Err(UseCaseError::InvalidCredentials);
        }

        if self.password_hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(user.id, &login_model.password).await;
        }

        info!(user_id = user.id, "authentication: user logged in");
        Ok(UserModel::from(user))
    }

    /// Creates the demo account unless a user with that username already exists.
    pub async fn ensure_demo_account(&self, demo_account: &DemoAccount) -> AnyResult<bool> {
        if self
            .user_repository
            .find_by_username(demo_account.username.clone())
            .await?
            .is_some()
        {
            debug!(username = %demo_account.username, "authentication: demo account already present");
            return Ok(false);
        }

        let insert_user_entity = InsertUserEntity {
            username: demo_account.username.clone(),
            email: demo_account.email.clone(),
            password_hash: self.password_hasher.hash(&demo_account.password)?,
            created_at: Utc::now().naive_utc(),
        };

        let created = self.user_repository.create(insert_user_entity).await?.is_some();
        if created {
            info!(username = %demo_account.username, "authentication: demo account created");
        }

        Ok(created)
    }

    // Failing to upgrade must not fail the login; the old hash still verifies.
    async fn upgrade_hash(&self, user_id: i32, password: &str) {
        let password_hash = match self.password_hasher.hash(password) {
            Ok(hash) => hash,
            Err(err) => {
                warn!(user_id, error = ?err, "authentication: failed to rehash password");
                return;
            }
        };

        match self
            .user_repository
            .update_password_hash(user_id, password_hash)
            .await
        {
            Ok(_) => info!(
                user_id,
                scheme = %self.password_hasher.scheme(),
                "authentication: password hash upgraded"
            ),
            Err(err) => warn!(user_id, db_error = ?err, "authentication: failed to store upgraded hash"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::PasswordScheme,
        domain::{entities::users::UserEntity, repositories::users::MockUserRepository},
    };
    use mockall::predicate::eq;

    fn sha256() -> PasswordHasher {
        PasswordHasher::new(PasswordScheme::Sha256)
    }

    fn stored_user(password: &str, hasher: PasswordHasher) -> UserEntity {
        UserEntity {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: hasher.hash(password).unwrap(),
            avatar_path: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn register_model(password: &str, confirm: &str) -> RegisterUserModel {
        RegisterUserModel {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn register_rejects_missing_fields_without_touching_store() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_create().never();
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let mut model = register_model("password123", "password123");
        model.email = "   ".to_string();

        let result = usecase.register(model).await;

        assert!(matches!(result, Err(UseCaseError::MissingFields)));
    }

    #[tokio::test]
    async fn register_rejects_mismatched_confirmation() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_create().never();
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase.register(register_model("password123", "password124")).await;

        assert!(matches!(result, Err(UseCaseError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_create().never();
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase.register(register_model("short7!", "short7!")).await;

        assert!(matches!(result, Err(UseCaseError::PasswordTooShort)));
    }

    #[tokio::test]
    async fn register_reports_taken_username() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_create()
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase.register(register_model("password123", "password123")).await;

        assert!(matches!(result, Err(UseCaseError::UsernameOrEmailTaken)));
    }

    #[tokio::test]
    async fn register_stores_trimmed_identity_and_hash() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_create()
            .withf(|entity| {
                entity.username == "alice"
                    && entity.email == "alice@example.com"
                    && entity.password_hash == sha256().hash("password123").unwrap()
            })
            .returning(|entity| {
                let user = UserEntity {
                    id: 1,
                    username: entity.username,
                    email: entity.email,
                    password_hash: entity.password_hash,
                    avatar_path: None,
                    created_at: entity.created_at,
                };
                Box::pin(async move { Ok(Some(user)) })
            });
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let mut model = register_model("password123", "password123");
        model.username = "  alice ".to_string();
        let user = usecase.register(model).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn login_returns_matching_user() {
        let stored = stored_user("password123", sha256());
        let expected = stored.clone();
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .with(eq("alice".to_string()))
            .returning(move |_| {
                let user = stored.clone();
                Box::pin(async move { Ok(Some(user)) })
            });
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let user = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, expected.id);
        assert_eq!(user.username, expected.username);
        assert_eq!(user.email, expected.email);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let stored = stored_user("password123", sha256());
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(move |_| {
            let user = stored.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "password124".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_with_unknown_user_fails_generically() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async { Ok(None) }));
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase
            .login(LoginModel {
                username: "nobody".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().never();
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let result = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: String::new(),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::MissingCredentials)));
    }

    #[tokio::test]
    async fn login_upgrades_legacy_hash_when_argon2_configured() {
        let stored = stored_user("password123", sha256());
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(move |_| {
            let user = stored.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        user_repo
            .expect_update_password_hash()
            .withf(|user_id, hash| *user_id == 7 && hash.starts_with("$argon2id$"))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));
        let usecase = AuthenticationUseCase::new(
            Arc::new(user_repo),
            PasswordHasher::new(PasswordScheme::Argon2),
        );

        let user = usecase
            .login(LoginModel {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn demo_account_is_created_once() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .with(eq("admin".to_string()))
            .returning(|_| Box::pin(async { Ok(None) }));
        user_repo
            .expect_create()
            .withf(|entity| entity.username == "admin" && entity.email == "admin@streamflow.com")
            .times(1)
            .returning(|entity| {
                let user = UserEntity {
                    id: 1,
                    username: entity.username,
                    email: entity.email,
                    password_hash: entity.password_hash,
                    avatar_path: None,
                    created_at: entity.created_at,
                };
                Box::pin(async move { Ok(Some(user)) })
            });
        let usecase = AuthenticationUseCase::new(Arc::new(user_repo), sha256());

        let created = usecase
            .ensure_demo_account(&DemoAccount {
                username: "admin".to_string(),
                email: "admin@streamflow.com".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();

        assert!(created);
    }
}
