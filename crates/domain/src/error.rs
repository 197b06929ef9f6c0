//! # ドメイン層エラー定義
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | 参照先エンティティが存在しない |
//!
//! メッセージはそのままクライアントに返るため英語で記述する。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドの欠落、文字数超過、不正なフォーマットなど。
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// エンティティの種類（"User", "Store", "Product"）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },
}

impl DomainError {
    /// 必須フィールド欠落のバリデーションエラー
    pub fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}
