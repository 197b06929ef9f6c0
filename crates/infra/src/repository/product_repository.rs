//! # ProductRepository
//!
//! 商品の永続化を担当するリポジトリ。
//!
//! 価格は `NUMERIC(12,2)` を `rust_decimal::Decimal` として読み書きする。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use storehub_domain::{
    product::{NewProduct, Product, ProductId, ProductListing, ProductPatch},
    store::{Store, StoreId},
    user::{Email, UserId, UserSummary},
    value_objects::{Price, ProductName, StoreName, UserName},
};

use super::corrupted;
use crate::error::InfraError;

/// 商品リポジトリトレイト
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を挿入する
    async fn insert(&self, product: &NewProduct) -> Result<Product, InfraError>;

    /// 全商品を所属ストア・所有ユーザー付きで ID 昇順に取得する
    async fn find_all_with_store(&self) -> Result<Vec<ProductListing>, InfraError>;

    /// ID で商品を検索する
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError>;

    /// ストアに属する商品を作成日時の降順で取得する
    async fn find_by_store(&self, store_id: &StoreId) -> Result<Vec<Product>, InfraError>;

    /// 指定されたフィールドのみ更新する
    async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product, InfraError>;

    /// 商品を削除する
    async fn delete(&self, id: &ProductId) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id:         i64,
    store_id:   i64,
    name:       String,
    price:      Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = InfraError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product::from_db(
            ProductId::from_db(row.id),
            StoreId::from_db(row.store_id),
            ProductName::new(row.name).map_err(corrupted)?,
            Price::from_db(row.price),
            row.created_at,
            row.updated_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct ProductListingRow {
    #[sqlx(flatten)]
    product:          ProductRow,
    store_user_id:    i64,
    store_name:       String,
    store_created_at: DateTime<Utc>,
    store_updated_at: DateTime<Utc>,
    user_name:        String,
    user_email:       String,
}

impl TryFrom<ProductListingRow> for ProductListing {
    type Error = InfraError;

    fn try_from(row: ProductListingRow) -> Result<Self, Self::Error> {
        let user_id = UserId::from_db(row.store_user_id);
        let store = Store::from_db(
            StoreId::from_db(row.product.store_id),
            user_id,
            StoreName::new(row.store_name).map_err(corrupted)?,
            row.store_created_at,
            row.store_updated_at,
        );
        let user = UserSummary {
            id:    user_id,
            name:  UserName::new(row.user_name).map_err(corrupted)?,
            email: Email::new(row.user_email).map_err(corrupted)?,
        };
        Ok(ProductListing {
            product: row.product.try_into()?,
            store,
            user,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, store_id, name, price, created_at, updated_at";

/// PostgreSQL 実装の ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(store_id = %product.store_id))]
    async fn insert(&self, product: &NewProduct) -> Result<Product, InfraError> {
        let sql = format!(
            "INSERT INTO products (store_id, name, price, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {PRODUCT_COLUMNS}"
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(product.store_id.as_i64())
            .bind(product.name.as_str())
            .bind(product.price.as_decimal())
            .bind(product.now)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all_with_store(&self) -> Result<Vec<ProductListing>, InfraError> {
        let rows: Vec<ProductListingRow> = sqlx::query_as(
            r#"
            SELECT
                p.id,
                p.store_id,
                p.name,
                p.price,
                p.created_at,
                p.updated_at,
                s.user_id AS store_user_id,
                s.name AS store_name,
                s.created_at AS store_created_at,
                s.updated_at AS store_updated_at,
                u.name AS user_name,
                u.email AS user_email
            FROM products p
            INNER JOIN stores s ON s.id = p.store_id
            INNER JOIN users u ON u.id = s.user_id
            ORDER BY p.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductListing::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%store_id))]
    async fn find_by_store(&self, store_id: &StoreId) -> Result<Vec<Product>, InfraError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(store_id.as_i64())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product, InfraError> {
        let sql = format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                price = COALESCE($3, price), \
                store_id = COALESCE($4, store_id), \
                updated_at = $5 \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .bind(patch.name.as_ref().map(ProductName::as_str))
            .bind(patch.price.map(|p| p.as_decimal()))
            .bind(patch.store_id.map(|s| s.as_i64()))
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| InfraError::not_found("Product", id))?
            .try_into()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &ProductId) -> Result<(), InfraError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(InfraError::not_found("Product", id));
        }
        Ok(())
    }
}
