//! # リクエストサマリログ
//!
//! 1 リクエストにつき 1 行、メソッド・パス・ステータス・所要時間・結果区分を
//! まとめて出力する tower Layer。
//!
//! 結果区分（`http.outcome`）でログレベルを変える:
//!
//! | ステータス | outcome | レベル |
//! |-----------|---------|--------|
//! | 1xx〜3xx | `success` | INFO |
//! | 4xx | `client_error` | INFO |
//! | 5xx | `server_error` | WARN |
//!
//! `/`・`/status`・`/health*` は監視用の疎通確認なので出力しない。
//! スパンのフィールド（request_id など）を載せるため `TraceLayer` の内側に置く。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response, StatusCode};
use tower::{Layer, Service};

/// サマリログを出さないパス
fn is_probe_path(path: &str) -> bool {
    matches!(path, "/" | "/status") || path.starts_with("/health")
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "server_error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

/// 完了時に出力するための、リクエスト受付時点の情報
struct RequestSummary {
    method:     String,
    path:       String,
    request_id: String,
    started_at: Instant,
}

impl RequestSummary {
    fn begin<B>(req: &Request<B>) -> Self {
        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_owned();
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_owned(),
            request_id,
            started_at: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn responded(&self, status: StatusCode) {
        let outcome = outcome(status);
        let latency_ms = self.elapsed_ms();
        if status.is_server_error() {
            tracing::warn!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.request_id = %self.request_id,
                http.status_code = status.as_u16(),
                http.outcome = outcome,
                http.latency_ms = latency_ms,
                "リクエスト完了"
            );
        } else {
            tracing::info!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.request_id = %self.request_id,
                http.status_code = status.as_u16(),
                http.outcome = outcome,
                http.latency_ms = latency_ms,
                "リクエスト完了"
            );
        }
    }

    fn failed(&self, error: &dyn std::fmt::Display) {
        tracing::error!(
            log.r#type = "canonical",
            http.method = %self.method,
            http.path = %self.path,
            http.request_id = %self.request_id,
            http.outcome = "server_error",
            http.latency_ms = self.elapsed_ms(),
            error.message = %error,
            "リクエスト処理エラー"
        );
    }
}

/// リクエストサマリログを出力する Layer
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // ready 済みの inner を持ち出し、self には clone を残す
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);

        if is_probe_path(req.uri().path()) {
            return Box::pin(inner.call(req));
        }

        let summary = RequestSummary::begin(&req);
        Box::pin(async move {
            let result = inner.call(req).await;
            match &result {
                Ok(response) => summary.responded(response.status()),
                Err(err) => summary.failed(err),
            }
            result
        })
    }
}
