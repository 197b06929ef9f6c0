/// DB の BIGSERIAL 列に対応する ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i64` をラップ、JSON では数値そのもの）
/// - `new()`: クライアント入力を検証して作成（正の整数のみ）
/// - `from_db()`: DB から取得した値で復元
/// - `as_i64()`: 内部値の取得
/// - `FromStr`: パスパラメータ（`/stores/:id` など）の解析
///
/// # 使用例
///
/// ```rust
/// use storehub_domain::store::StoreId;
///
/// let id: StoreId = "42".parse().unwrap();
/// assert_eq!(id.as_i64(), 42);
/// assert!("abc".parse::<StoreId>().is_err());
/// ```
macro_rules! define_serial_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(i64);

        impl $Name {
            /// クライアント入力から ID を作成する
            pub fn new(value: i64) -> Result<Self, $crate::DomainError> {
                if value <= 0 {
                    return Err($crate::DomainError::Validation(format!(
                        "{} must be a positive integer",
                        $label
                    )));
                }
                Ok(Self(value))
            }

            /// DB から取得した値で復元する（検証しない）
            pub fn from_db(value: i64) -> Self {
                Self(value)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|_| {
                    $crate::DomainError::Validation(format!("{} must be an integer", $label))
                })?;
                Self::new(value)
            }
        }
    };
}

/// バリデーション付き String Newtype を定義する宣言型マクロ
///
/// - `new()`: trim + 空チェック + 最大長チェック
/// - `as_str()`, `into_string()`
/// - `Display`
///
/// 最大長は DB の `VARCHAR(n)` と揃える。超過を DB に任せると
/// 500 になるため、ここで 400 として弾く。
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::required($label));
                }

                if value.chars().count() > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{} must be at most {} characters",
                        $label, $max_length
                    )));
                }

                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }
    };
}
