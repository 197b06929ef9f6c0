//! # StoreHub ドメイン層
//!
//! ユーザー・ストア・商品の 3 エンティティと、その値オブジェクトを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）に一切依存しない。
//!
//! ## エンティティの関係
//!
//! ```text
//! User 1 ──< Store 1 ──< Product
//! ```
//!
//! - ストアは必ず 1 人のユーザーに所有される
//! - 商品は必ず 1 つのストアに属する
//! - ユーザー削除はストア・商品へ連鎖削除される（DB の `ON DELETE CASCADE`）
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメインエラー
//! - [`clock`] - 時刻プロバイダ
//! - [`value_objects`] - 名前・価格などの値オブジェクト
//! - [`user`], [`store`], [`product`] - エンティティ
//!
//! ## 使用例
//!
//! ```rust
//! use storehub_domain::{DomainError, user::Email};
//!
//! assert!(Email::new("a@a.com").is_ok());
//! assert!(matches!(Email::new("a@a"), Err(DomainError::Validation(_))));
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod product;
pub mod store;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
