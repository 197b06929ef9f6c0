//! # 値オブジェクト
//!
//! エンティティ間で共有される名前型と価格型。
//!
//! - [`UserName`], [`StoreName`], [`ProductName`]: trim 後に空でなく 255 文字以内
//! - [`Price`]: 0 以上、小数点以下 2 桁（`NUMERIC(12,2)` に対応）

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 名前系フィールドの最大文字数（`VARCHAR(255)`）
pub const MAX_NAME_LENGTH: usize = 255;

define_validated_string! {
    /// ユーザー名
    pub struct UserName {
        label: "name",
        max_length: MAX_NAME_LENGTH,
    }
}

define_validated_string! {
    /// ストア名
    pub struct StoreName {
        label: "name",
        max_length: MAX_NAME_LENGTH,
    }
}

define_validated_string! {
    /// 商品名
    pub struct ProductName {
        label: "name",
        max_length: MAX_NAME_LENGTH,
    }
}

/// 商品価格
///
/// `NUMERIC(12,2)` に格納できる範囲（0 以上 10^10 未満）に限定する。
/// 小数点以下 3 桁以上は銀行丸めで 2 桁に揃える。
///
/// JSON では数値として出力する（`"9.99"` ではなく `9.99`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// 小数点以下の桁数
    pub const SCALE: u32 = 2;

    /// 格納可能な上限（この値は含まない）
    pub fn upper_bound() -> Decimal {
        Decimal::from(10_000_000_000_i64)
    }

    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        let rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        if rounded >= Self::upper_bound() {
            return Err(DomainError::Validation(
                "price is too large".to_string(),
            ));
        }

        Ok(Self(rounded.normalize()))
    }

    /// DB から取得した値で復元する
    pub fn from_db(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    /// 数値文字列を価格として解析する
    ///
    /// `"12.5"` のような通常表記に加え、`"1e3"` のような指数表記も受け付ける。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| DomainError::Validation("price must be a number".to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
