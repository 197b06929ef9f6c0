//! # リクエスト値の変換ヘルパー
//!
//! 数値フィールド（`price`, `storeId`, `userId`）は JSON の数値と
//! 数値文字列の両方を受け付ける。

use std::str::FromStr;

use serde::Deserialize;
use storehub_domain::{DomainError, value_objects::Price};

/// JSON の数値または文字列
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    pub fn to_price(&self) -> Result<Price, DomainError> {
        self.as_text().parse()
    }

    /// ID 型（`UserId`, `StoreId` など）に変換する
    pub fn to_id<T>(&self) -> Result<T, DomainError>
    where
        T: FromStr<Err = DomainError>,
    {
        self.as_text().parse()
    }
}

/// 必須フィールドを取り出す
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::required(field))
}
