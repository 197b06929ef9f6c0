//! # StoreRepository
//!
//! ストアの永続化を担当するリポジトリ。
//!
//! 存在しないユーザーを参照した場合は `stores_user_id_fkey` 違反となり、
//! `ForeignKeyViolation` として返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storehub_domain::{
    store::{NewStore, Store, StoreId, StorePatch, StoreWithOwner},
    user::{Email, UserId, UserSummary},
    value_objects::{StoreName, UserName},
};

use super::corrupted;
use crate::error::InfraError;

/// ストアリポジトリトレイト
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// ストアを挿入する
    async fn insert(&self, store: &NewStore) -> Result<Store, InfraError>;

    /// ID でストアを検索する
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, InfraError>;

    /// ID でストアを所有ユーザー付きで検索する
    async fn find_with_owner(&self, id: &StoreId) -> Result<Option<StoreWithOwner>, InfraError>;

    /// ユーザーが所有するストアを ID 昇順で取得する
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Store>, InfraError>;

    /// 指定されたフィールドのみ更新する
    ///
    /// 対象が存在しない場合は `NotFound`。
    async fn update(
        &self,
        id: &StoreId,
        patch: &StorePatch,
        now: DateTime<Utc>,
    ) -> Result<Store, InfraError>;

    /// ストアを削除する（商品は連鎖削除）
    async fn delete(&self, id: &StoreId) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
pub(crate) struct StoreRow {
    pub(crate) id:         i64,
    pub(crate) user_id:    i64,
    pub(crate) name:       String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = InfraError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        Ok(Store::from_db(
            StoreId::from_db(row.id),
            UserId::from_db(row.user_id),
            StoreName::new(row.name).map_err(corrupted)?,
            row.created_at,
            row.updated_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct StoreWithOwnerRow {
    #[sqlx(flatten)]
    store:      StoreRow,
    user_name:  String,
    user_email: String,
}

impl TryFrom<StoreWithOwnerRow> for StoreWithOwner {
    type Error = InfraError;

    fn try_from(row: StoreWithOwnerRow) -> Result<Self, Self::Error> {
        let user = UserSummary {
            id:    UserId::from_db(row.store.user_id),
            name:  UserName::new(row.user_name).map_err(corrupted)?,
            email: Email::new(row.user_email).map_err(corrupted)?,
        };
        Ok(StoreWithOwner {
            store: row.store.try_into()?,
            user,
        })
    }
}

const STORE_COLUMNS: &str = "id, user_id, name, created_at, updated_at";

/// PostgreSQL 実装の StoreRepository
#[derive(Debug, Clone)]
pub struct PostgresStoreRepository {
    pool: PgPool,
}

impl PostgresStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PostgresStoreRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %store.user_id))]
    async fn insert(&self, store: &NewStore) -> Result<Store, InfraError> {
        let sql = format!(
            "INSERT INTO stores (user_id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $3) RETURNING {STORE_COLUMNS}"
        );
        let row: StoreRow = sqlx::query_as(&sql)
            .bind(store.user_id.as_i64())
            .bind(store.name.as_str())
            .bind(store.now)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, InfraError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        let row: Option<StoreRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Store::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_with_owner(&self, id: &StoreId) -> Result<Option<StoreWithOwner>, InfraError> {
        let row: Option<StoreWithOwnerRow> = sqlx::query_as(
            r#"
            SELECT
                s.id,
                s.user_id,
                s.name,
                s.created_at,
                s.updated_at,
                u.name AS user_name,
                u.email AS user_email
            FROM stores s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoreWithOwner::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Store>, InfraError> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE user_id = $1 ORDER BY id ASC");
        let rows: Vec<StoreRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Store::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update(
        &self,
        id: &StoreId,
        patch: &StorePatch,
        now: DateTime<Utc>,
    ) -> Result<Store, InfraError> {
        let sql = format!(
            "UPDATE stores SET \
                name = COALESCE($2, name), \
                user_id = COALESCE($3, user_id), \
                updated_at = $4 \
             WHERE id = $1 RETURNING {STORE_COLUMNS}"
        );
        let row: Option<StoreRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .bind(patch.name.as_ref().map(StoreName::as_str))
            .bind(patch.user_id.map(|u| u.as_i64()))
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| InfraError::not_found("Store", id))?
            .try_into()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &StoreId) -> Result<(), InfraError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(InfraError::not_found("Store", id));
        }
        Ok(())
    }
}
