//! # PostgreSQL データベース接続管理
//!
//! 接続プールはアプリケーション起動時に一度だけ作成し、
//! リポジトリに注入して共有する。グローバルな接続は持たない。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use storehub_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/storehub").await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::error::InfraError;

/// PostgreSQL 接続プールを作成する
///
/// # 設定値
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// データベースマイグレーションを実行する
///
/// 適用済みのマイグレーションはスキップされる。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// 疎通確認（Readiness Check 用）
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
