//! # UserRepository
//!
//! ユーザーの永続化を担当するリポジトリ。
//!
//! メールアドレスの重複は `users_email_key` 制約で検出し、
//! `UniqueViolation { fields: ["email"] }` として返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storehub_domain::{
    user::{Email, NewUser, Password, User, UserId},
    value_objects::UserName,
};

use super::corrupted;
use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを挿入し、採番された ID を含むユーザーを返す
    async fn insert(&self, user: &NewUser) -> Result<User, InfraError>;

    /// 全ユーザーを ID 昇順で取得する
    async fn find_all(&self) -> Result<Vec<User>, InfraError>;

    /// ID でユーザーを検索する
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

    /// ユーザーを削除する
    ///
    /// 所有するストアと商品は DB の `ON DELETE CASCADE` で削除される。
    /// 対象が存在しない場合は `NotFound`。
    async fn delete(&self, id: &UserId) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id:         i64,
    name:       String,
    email:      String,
    password:   String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_db(
            UserId::from_db(row.id),
            UserName::new(row.name).map_err(corrupted)?,
            Email::new(row.email).map_err(corrupted)?,
            Password::new(row.password).map_err(corrupted)?,
            row.created_at,
            row.updated_at,
        ))
    }
}

const USER_COLUMNS: &str = "id, name, email, password, created_at, updated_at";

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, user: &NewUser) -> Result<User, InfraError> {
        let sql = format!(
            "INSERT INTO users (name, email, password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password.as_str())
            .bind(user.now)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &UserId) -> Result<(), InfraError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(InfraError::not_found("User", id));
        }
        Ok(())
    }
}
