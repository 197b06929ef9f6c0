//! ユーザー管理ユースケース

use std::sync::Arc;

use storehub_domain::{
    clock::Clock,
    user::{Email, NewUser, Password, User, UserId},
    value_objects::UserName,
};
use storehub_infra::repository::UserRepository;

use crate::error::ApiError;

/// ユーザー作成の入力
pub struct CreateUserInput {
    pub name:     UserName,
    pub email:    Email,
    pub password: Password,
}

/// ユーザー管理ユースケース
pub struct UserUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
    clock:           Arc<dyn Clock>,
}

impl UserUseCaseImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repository,
            clock,
        }
    }

    /// ユーザーを作成する
    ///
    /// メールアドレスの重複は DB の一意制約で検出され、409 になる。
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, ApiError> {
        let user = self
            .user_repository
            .insert(&NewUser {
                name:     input.name,
                email:    input.email,
                password: input.password,
                now:      self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = %user.id(), "ユーザーを作成しました");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.user_repository.find_all().await?)
    }

    /// ユーザーを削除する（所有ストア・商品も連鎖削除）
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.user_repository.delete(&id).await?;

        tracing::info!(user_id = %id, "ユーザーを削除しました");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use storehub_domain::clock::FixedClock;
    use storehub_infra::mock::MockDatabase;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn sut(db: &MockDatabase) -> UserUseCaseImpl {
        UserUseCaseImpl::new(
            Arc::new(db.user_repository()),
            Arc::new(FixedClock::new(fixed_now())),
        )
    }

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            name:     UserName::new("Alice").unwrap(),
            email:    Email::new(email).unwrap(),
            password: Password::new("secret").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_作成日時と更新日時に注入した時刻が設定される() {
        let db = MockDatabase::new();

        let user = sut(&db).create_user(input("a@example.com")).await.unwrap();

        assert_eq!(user.created_at(), fixed_now());
        assert_eq!(user.updated_at(), fixed_now());
    }

    #[tokio::test]
    async fn test_重複したメールアドレスは409になる() {
        let db = MockDatabase::new();
        let sut = sut(&db);
        sut.create_user(input("a@example.com")).await.unwrap();

        let result = sut.create_user(input("a@example.com")).await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::Conflict {
                fields: vec!["email".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_存在しないユーザーの削除は404になる() {
        let db = MockDatabase::new();

        let result = sut(&db).delete_user(UserId::from_db(42)).await;

        assert_eq!(result.unwrap_err(), ApiError::not_found("User"));
    }
}
