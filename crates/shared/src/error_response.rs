//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! API 全体で共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は API クレートの責務（shared に axum 依存を入れない）
//! - よく使うエラー種別は便利コンストラクタで提供し、URI のハードコードを排除
//! - 一意制約違反のみ `fields` に競合したフィールド名を載せる

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://storehub.example.com/errors";

/// 500 応答の固定 detail
pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred";

/// エラーレスポンス（RFC 9457 Problem Details）
///
/// `type` フィールドは URI で問題の種類を識別する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
    /// 競合したフィールド名（409 のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields:     Option<Vec<String>>,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"not-found"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
            fields: None,
        }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad-request", "Bad Request", 400, detail)
    }

    /// 404 Not Found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not Found", 404, detail)
    }

    /// 409 Conflict（一意制約違反）
    ///
    /// detail は競合したフィールド名から組み立てる。
    pub fn conflict(fields: Vec<String>) -> Self {
        let detail = format!("Unique constraint failed on: {}", fields.join(", "));
        Self {
            fields: Some(fields),
            ..Self::new("conflict", "Conflict", 409, detail)
        }
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値。開発モードでの詳細付与は API 層のミドルウェアが行う。
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            500,
            INTERNAL_ERROR_DETAIL,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_で全フィールドが正しく設定される() {
        let error = ErrorResponse::new("custom-error", "Custom Error", 418, "teapot");

        assert_eq!(
            error.error_type,
            "https://storehub.example.com/errors/custom-error"
        );
        assert_eq!(error.title, "Custom Error");
        assert_eq!(error.status, 418);
        assert_eq!(error.detail, "teapot");
        assert_eq!(error.fields, None);
    }

    #[test]
    fn test_conflict_が競合フィールドをdetailとfieldsに載せる() {
        let error = ErrorResponse::conflict(vec!["email".to_string()]);

        assert_eq!(error.status, 409);
        assert_eq!(error.detail, "Unique constraint failed on: email");
        assert_eq!(error.fields, Some(vec!["email".to_string()]));
    }

    #[test]
    fn test_internal_error_が500と固定detailを返す() {
        let error = ErrorResponse::internal_error();

        assert_eq!(
            error.error_type,
            "https://storehub.example.com/errors/internal-error"
        );
        assert_eq!(error.status, 500);
        assert_eq!(error.detail, INTERNAL_ERROR_DETAIL);
    }

    #[test]
    fn test_jsonシリアライズでtypeフィールド名が正しくfieldsは省略される() {
        let error = ErrorResponse::bad_request("name is required");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(
            json["type"],
            "https://storehub.example.com/errors/bad-request"
        );
        assert_eq!(json["title"], "Bad Request");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "name is required");
        assert!(json.get("error_type").is_none());
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_全便利コンストラクタのstatusが正しい() {
        assert_eq!(ErrorResponse::bad_request("").status, 400);
        assert_eq!(ErrorResponse::not_found("").status, 404);
        assert_eq!(ErrorResponse::conflict(vec![]).status, 409);
        assert_eq!(ErrorResponse::internal_error().status, 500);
    }

    #[test]
    fn test_jsonデシリアライズでfields未指定はnoneになる() {
        let json = r#"{
            "type": "https://storehub.example.com/errors/not-found",
            "title": "Not Found",
            "status": 404,
            "detail": "Record not found"
        }"#;
        let error: ErrorResponse = serde_json::from_str(json).unwrap();

        assert_eq!(error.status, 404);
        assert_eq!(error.detail, "Record not found");
        assert_eq!(error.fields, None);
    }
}
