//! # ヘルスチェック共通型
//!
//! - `GET /health` → [`HealthResponse`]
//! - `GET /health/ready` → [`ReadinessResponse`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Liveness 応答
///
/// ```
/// use storehub_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("storehub-api", "0.1.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:  String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            service: service.into(),
            version: version.into(),
        }
    }
}

/// 依存先 1 つ分のチェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

impl<E> From<Result<(), E>> for CheckStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(_) => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// Readiness 応答
///
/// 依存先ごとの結果を `checks` に持ち、1 つでも `Error` なら `not_ready`。
/// キー順で出力する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl Default for ReadinessResponse {
    fn default() -> Self {
        Self {
            status: ReadinessStatus::Ready,
            checks: BTreeMap::new(),
        }
    }
}

impl ReadinessResponse {
    /// チェック結果を追加する
    pub fn with_check(mut self, name: impl Into<String>, status: CheckStatus) -> Self {
        if status == CheckStatus::Error {
            self.status = ReadinessStatus::NotReady;
        }
        self.checks.insert(name.into(), status);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
