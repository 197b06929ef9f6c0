//! # リポジトリ実装
//!
//! ユーザー・ストア・商品の永続化を担当する。
//!
//! - トレイトはユースケース層から `Arc<dyn ...>` で注入される
//! - PostgreSQL 実装は `sqlx::query_as` + `FromRow` の実行時チェック
//! - 更新・削除で対象行がない場合は `InfraErrorKind::NotFound` を返す
//! - 制約違反は [`InfraError`](crate::InfraError) の `From<sqlx::Error>` で分類される

pub mod product_repository;
pub mod store_repository;
pub mod user_repository;

pub use product_repository::{PostgresProductRepository, ProductRepository};
pub use store_repository::{PostgresStoreRepository, StoreRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};

use crate::error::InfraError;

/// DB の値をドメインの値オブジェクトに変換できなかった場合のエラー
///
/// 制約で守られているため通常は発生しない。
pub(crate) fn corrupted(e: impl std::fmt::Display) -> InfraError {
    InfraError::unexpected(format!("不正なデータが格納されています: {e}"))
}
