//! # StoreHub API サーバー
//!
//! ユーザー・ストア・商品を管理する REST API。
//!
//! ```text
//! handler ─→ usecase ─→ storehub_infra::repository ─→ PostgreSQL
//!    │
//!    └─ error: DomainError / InfraError を HTTP レスポンスへ変換
//! ```
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの組み立て
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - 実行モードに応じた 500 応答の詳細制御
//! - [`usecase`] - ユースケース

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
