//! # アプリケーション設定
//!
//! 環境変数から設定を読み込む。`.env` ファイルがあれば `main` で
//! `dotenvy` が先に読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `3000` | ポート番号 |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `APP_ENV` | No | `development` | 実行モード（`development` / `production`） |
//!
//! ログ関連（`RUST_LOG`, `LOG_FORMAT`）は `storehub_shared::observability` が読む。

use std::env;

use thiserror::Error;

/// 実行モード
///
/// `Development` のときのみ 500 応答に内部エラーの詳細を含める。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    /// 500 応答に内部エラーの詳細を含めるか
    pub fn exposes_error_detail(self) -> bool {
        self == Self::Development
    }
}

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{key} の値が不正です: {value}")]
    Invalid { key: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 実行モード
    pub app_env:      AppEnv,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => 3000,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = match lookup("APP_ENV") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "APP_ENV",
                value,
            })?,
            None => AppEnv::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            app_env,
        })
    }
}
