//! # StoreHub インフラ層
//!
//! PostgreSQL との接続とリポジトリ実装を提供する。
//!
//! - [`db`] - 接続プールとマイグレーション
//! - [`error`] - タグ付きのインフラエラー（制約違反の分類を含む）
//! - [`repository`] - ユーザー・ストア・商品のリポジトリ
//! - `mock` - インメモリのリポジトリ実装（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
