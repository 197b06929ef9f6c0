//! # Observability 基盤
//!
//! - ログ出力形式（`LOG_FORMAT=json|pretty`）の選択
//! - subscriber の初期化（`RUST_LOG` によるフィルタ、`SpanTrace` 取得用の `ErrorLayer`）
//! - リクエスト ID の採番とリクエストスパンの生成

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,storehub=debug,tower_http=info,sqlx=warn";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON（本番向け）
    Json,
    /// 人間向けの整形出力
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(other.to_string()),
        }
    }
}

impl LogFormat {
    /// 環境変数の値から決める。未設定・不正値は `Pretty`
    ///
    /// subscriber 初期化前に呼ばれるため、不正値の警告は stderr に出す。
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::parse::<Self>) {
            Some(Ok(format)) => format,
            Some(Err(other)) => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
            None => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（`app` スパンの `service` フィールド）
    pub service_name:   String,
    pub log_format:     LogFormat,
    /// `RUST_LOG` が未設定のときに使うフィルタ
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// `LOG_FORMAT` を読んで設定を作る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let value = std::env::var("LOG_FORMAT").ok();
        Self::new(service_name, LogFormat::from_env_value(value.as_deref()))
    }
}

/// グローバル subscriber を初期化する
///
/// `ErrorLayer` を含めるので、`InfraError` が捕捉する `SpanTrace` に
/// リポジトリ呼び出しのスパンが記録される。二重初期化はエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
    config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_filter));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
}

/// `x-request-id` を UUID v7 で採番する
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        http::HeaderValue::from_str(&uuid::Uuid::now_v7().to_string())
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// `TraceLayer::make_span_with` 用のリクエストスパン
///
/// パスのみ記録し、クエリ文字列は含めない。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
