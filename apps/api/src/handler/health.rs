//! # ヘルスチェック・サービス情報ハンドラ
//!
//! - `GET /` - サービス名
//! - `GET /status` - 稼働確認用の固定メッセージ
//! - `GET /health` - Liveness Check（常に `"healthy"`）
//! - `GET /health/ready` - Readiness Check（DB への `SELECT 1`）
//!
//! レスポンス型は [`storehub_shared::HealthResponse`] /
//! [`storehub_shared::ReadinessResponse`] を参照。

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::PgPool;
use storehub_infra::db;
use storehub_shared::{HealthResponse, ReadinessResponse};

/// サービス名（`GET /` で返す）
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// DB チェックのタイムアウト
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub ok:      bool,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: &'static str,
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        ok:      true,
        service: SERVICE_NAME,
    })
}

/// GET /status
pub async fn api_status() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "API Online",
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(SERVICE_NAME, env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool: PgPool,
}

/// GET /health/ready
///
/// DB に接続できれば 200、できなければ 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(DB_CHECK_TIMEOUT, db::ping(&state.pool)).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("timed out".to_string()),
    };
    if let Err(reason) = &database {
        tracing::warn!(%reason, "readiness check: database unavailable");
    }

    let response = ReadinessResponse::default().with_check("database", database.into());
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ルートはサービス名を返す() {
        let app = Router::new().route("/", get(service_info));

        let (status, body) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "service": "storehub-api" }));
    }

    #[tokio::test]
    async fn test_statusはapi_onlineを返す() {
        let app = Router::new().route("/status", get(api_status));

        let (status, body) = get_json(app, "/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "API Online" }));
    }

    #[tokio::test]
    async fn test_healthはバージョンを返す() {
        let app = Router::new().route("/health", get(health_check));

        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "storehub-api");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_db未接続ならreadinessは503を返す() {
        // 接続を拒否されるポートを指す
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy("postgres://storehub@127.0.0.1:1/storehub")
            .unwrap();
        let app = Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(Arc::new(ReadinessState { pool }));

        let (status, body) = get_json(app, "/health/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({ "status": "not_ready", "checks": { "database": "error" } })
        );
    }
}
