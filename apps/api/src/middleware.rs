//! # ミドルウェア
//!
//! ## 内部エラー詳細の公開制御
//!
//! [`ApiError`](crate::error::ApiError) は 500 応答のボディに常に固定文言を書き、
//! 内部の詳細を [`InternalErrorDetail`] extension に載せる。
//! このミドルウェアは extension を取り除き、開発モードの場合のみ
//! 詳細を `detail` に差し込んだボディに置き換える。
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/users", get(list_users))
//!     .layer(from_fn_with_state(config.app_env, expose_internal_error_detail))
//! ```

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use storehub_shared::ErrorResponse;

use crate::{config::AppEnv, error::InternalErrorDetail};

/// 実行モードに応じて 500 応答に内部エラーの詳細を含める
pub async fn expose_internal_error_detail(
    State(app_env): State<AppEnv>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(InternalErrorDetail(detail)) =
        response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };
    if !app_env.exposes_error_detail() {
        return response;
    }

    let body = ErrorResponse {
        detail,
        ..ErrorResponse::internal_error()
    };
    (response.status(), Json(body)).into_response()
}
