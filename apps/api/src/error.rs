//! # API エラー定義
//!
//! ドメイン層・インフラ層のエラーを HTTP レスポンスに変換する。
//! ハンドラは DB のエラーコードを直接見ない。変換はすべてここで行う。
//!
//! ## エラーの階層
//!
//! ```text
//! DomainError ─┐
//! InfraError  ─┼─→ ApiError ─→ (StatusCode, ErrorResponse)
//! JsonRejection┘
//! ```
//!
//! ## InfraError の変換表
//!
//! | InfraErrorKind | ステータス | detail |
//! |----------------|-----------|--------|
//! | `UniqueViolation` | 409 | 競合したフィールド名 |
//! | `NotFound` | 404 | `"{entity} not found"` |
//! | `ForeignKeyViolation` | 400 | `"referenced id does not exist"` |
//! | `InvalidInput` | 400 | メッセージそのまま |
//! | `Database` / `Unexpected` | 500 | 固定文言（開発モードのみ詳細を付与） |
//!
//! 500 の詳細はレスポンス extension の [`InternalErrorDetail`] に載せ、
//! [`crate::middleware::expose_internal_error_detail`] が実行モードに応じて
//! ボディへ反映する。

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storehub_domain::DomainError;
use storehub_infra::{InfraError, InfraErrorKind};
use storehub_shared::ErrorResponse;
use thiserror::Error;

/// 外部キー違反時の detail
pub const REFERENCED_ID_MISSING: &str = "referenced id does not exist";

/// API 層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 不正なリクエスト（400）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リソースが見つからない（404）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 一意制約違反（409）
    #[error("一意制約違反: {}", .fields.join(", "))]
    Conflict { fields: Vec<String> },

    /// 内部エラー（500）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl ApiError {
    /// エンティティ種別から 404 エラーを作る
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }
}

/// 500 応答に付与する内部エラーの詳細
///
/// レスポンス extension として運ばれ、クライアントには直接返らない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalErrorDetail(pub String);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            DomainError::NotFound { entity_type, .. } => Self::not_found(entity_type),
        }
    }
}

impl From<InfraError> for ApiError {
    fn from(err: InfraError) -> Self {
        let (kind, span_trace) = err.into_parts();
        match kind {
            InfraErrorKind::UniqueViolation { fields, .. } => Self::Conflict { fields },
            InfraErrorKind::NotFound { entity, .. } => Self::not_found(entity),
            InfraErrorKind::ForeignKeyViolation { constraint } => {
                tracing::debug!(%constraint, "外部キー制約違反");
                Self::BadRequest(REFERENCED_ID_MISSING.to_string())
            }
            InfraErrorKind::InvalidInput(msg) => Self::BadRequest(msg),
            kind @ (InfraErrorKind::Database(_) | InfraErrorKind::Unexpected(_)) => {
                tracing::error!(
                    error = %kind,
                    span_trace = %span_trace,
                    "データベースエラー"
                );
                Self::Internal(kind.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, detail) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(msg),
                None,
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg), None),
            ApiError::Conflict { fields } => {
                (StatusCode::CONFLICT, ErrorResponse::conflict(fields), None)
            }
            ApiError::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal_error(),
                Some(InternalErrorDetail(detail)),
            ),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(detail);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use storehub_shared::error_response::INTERNAL_ERROR_DETAIL;

    use super::*;

    async fn into_parts(err: ApiError) -> (StatusCode, ErrorResponse, Option<InternalErrorDetail>) {
        let response = err.into_response();
        let status = response.status();
        let detail = response.extensions().get::<InternalErrorDetail>().cloned();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), detail)
    }

    #[rstest]
    #[case::一意制約違反(
        InfraError::unique_violation("users_email_key"),
        ApiError::Conflict { fields: vec!["email".to_string()] }
    )]
    #[case::対象なし(
        InfraError::not_found("Store", 1),
        ApiError::NotFound("Store not found".to_string())
    )]
    #[case::外部キー違反(
        InfraError::foreign_key_violation("products_store_id_fkey"),
        ApiError::BadRequest(REFERENCED_ID_MISSING.to_string())
    )]
    #[case::入力エラー(
        InfraError::invalid_input("price must not be negative"),
        ApiError::BadRequest("price must not be negative".to_string())
    )]
    #[case::予期しないエラー(
        InfraError::unexpected("boom"),
        ApiError::Internal("予期しないエラー: boom".to_string())
    )]
    fn test_infra_errorの変換(#[case] input: InfraError, #[case] expected: ApiError) {
        assert_eq!(ApiError::from(input), expected);
    }

    #[test]
    fn test_分類できないsqlxエラーは内部エラーになる() {
        let err: InfraError = sqlx::Error::PoolTimedOut.into();

        assert!(matches!(ApiError::from(err), ApiError::Internal(_)));
    }

    #[test]
    fn test_domain_errorの変換() {
        assert_eq!(
            ApiError::from(DomainError::required("email")),
            ApiError::BadRequest("email is required".to_string())
        );
        assert_eq!(
            ApiError::from(DomainError::NotFound {
                entity_type: "User",
                id:          "3".to_string(),
            }),
            ApiError::NotFound("User not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_409はfieldsを含むproblem_detailsを返す() {
        let (status, body, detail) = into_parts(ApiError::Conflict {
            fields: vec!["email".to_string()],
        })
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.status, 409);
        assert_eq!(body.detail, "Unique constraint failed on: email");
        assert_eq!(body.fields, Some(vec!["email".to_string()]));
        assert_eq!(detail, None);
    }

    #[tokio::test]
    async fn test_500は固定文言を返し詳細をextensionに載せる() {
        let (status, body, detail) =
            into_parts(ApiError::Internal("connection refused".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, INTERNAL_ERROR_DETAIL);
        assert_eq!(
            detail,
            Some(InternalErrorDetail("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_400はメッセージをdetailに載せる() {
        let (status, body, _) =
            into_parts(ApiError::BadRequest(REFERENCED_ID_MISSING.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "referenced id does not exist");
        assert_eq!(body.title, "Bad Request");
    }
}
