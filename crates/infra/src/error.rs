//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを、API 層が HTTP ステータスに
//! 変換できるタグ付きの種別に分類する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! ## sqlx エラーの分類
//!
//! `From<sqlx::Error>` の中で一度だけ分類する。
//!
//! | PostgreSQL のエラー | 種別 |
//! |--------------------|------|
//! | 一意制約違反 (23505) | [`InfraErrorKind::UniqueViolation`] |
//! | 外部キー制約違反 (23503) | [`InfraErrorKind::ForeignKeyViolation`] |
//! | NOT NULL / CHECK 制約違反 | [`InfraErrorKind::InvalidInput`] |
//! | それ以外 | [`InfraErrorKind::Database`] |
//!
//! 一意制約は制約名から API に返すフィールド名へ変換する（[`unique_constraint_fields`]）。

use std::fmt;

use derive_more::Display;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別と生成時点の [`SpanTrace`] を保持する。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 分類できなかったデータベースエラー
    ///
    /// 接続失敗、タイムアウト、SQL 構文エラーなど。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 一意制約違反
    #[error("一意制約違反: {constraint} ({})", .fields.join(", "))]
    UniqueViolation {
        /// 違反した制約名
        constraint: String,
        /// 競合したフィールド（API のフィールド名）
        fields:     Vec<String>,
    },

    /// 外部キー制約違反（参照先が存在しない）
    #[error("外部キー制約違反: {constraint}")]
    ForeignKeyViolation {
        /// 違反した制約名
        constraint: String,
    },

    /// 更新・削除対象のレコードが存在しない
    #[error("レコードが見つかりません: {entity}(id={id})")]
    NotFound {
        entity: &'static str,
        id:     String,
    },

    /// クライアント入力エラー
    ///
    /// DB の NOT NULL / CHECK 制約で検出されたが、原因はクライアント入力にある。
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

/// 一意制約名と、API で返すフィールド名の対応表
const UNIQUE_CONSTRAINT_FIELDS: &[(&str, &[&str])] = &[("users_email_key", &["email"])];

/// 一意制約名をフィールド名に変換する
///
/// 対応表にない制約は制約名そのものを返す。
pub fn unique_constraint_fields(constraint: &str) -> Vec<String> {
    UNIQUE_CONSTRAINT_FIELDS
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, fields)| fields.iter().map(|f| (*f).to_string()).collect())
        .unwrap_or_else(|| vec![constraint.to_string()])
}

/// データベースエラーの種類と制約名から、タグ付きの種別に分類する
///
/// 制約違反でない場合は `None` を返す（呼び出し側で `Database` として扱う）。
pub fn classify_database_error(
    kind: ErrorKind,
    constraint: Option<&str>,
    message: &str,
) -> Option<InfraErrorKind> {
    let constraint_name = constraint.unwrap_or_default().to_string();
    match kind {
        ErrorKind::UniqueViolation => Some(InfraErrorKind::UniqueViolation {
            fields:     constraint
                .map(unique_constraint_fields)
                .unwrap_or_default(),
            constraint: constraint_name,
        }),
        ErrorKind::ForeignKeyViolation => Some(InfraErrorKind::ForeignKeyViolation {
            constraint: constraint_name,
        }),
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            Some(InfraErrorKind::InvalidInput(message.to_string()))
        }
        _ => None,
    }
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// InfraError を分解して InfraErrorKind と SpanTrace を取り出す
    pub fn into_parts(self) -> (InfraErrorKind, SpanTrace) {
        (self.kind, self.span_trace)
    }

    fn with_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    // ===== Convenience constructors =====

    /// 一意制約違反エラーを生成する（インメモリ実装用）
    pub fn unique_violation(constraint: &str) -> Self {
        Self::with_kind(InfraErrorKind::UniqueViolation {
            constraint: constraint.to_string(),
            fields:     unique_constraint_fields(constraint),
        })
    }

    /// 外部キー制約違反エラーを生成する（インメモリ実装用）
    pub fn foreign_key_violation(constraint: &str) -> Self {
        Self::with_kind(InfraErrorKind::ForeignKeyViolation {
            constraint: constraint.to_string(),
        })
    }

    /// 更新・削除対象が存在しないエラーを生成する
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::with_kind(InfraErrorKind::NotFound {
            entity,
            id: id.to_string(),
        })
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::InvalidInput(msg.into()))
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::Unexpected(msg.into()))
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        let classified = source.as_database_error().and_then(|db_err| {
            classify_database_error(db_err.kind(), db_err.constraint(), db_err.message())
        });
        let kind = classified.unwrap_or_else(|| InfraErrorKind::Database(source));
        Self::with_kind(kind)
    }
}
