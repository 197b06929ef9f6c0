//! # HTTP リクエストハンドラ
//!
//! リソースごとにモジュールを分ける。各ハンドラはリクエスト DTO を
//! ドメインの値オブジェクトに変換してユースケースを呼び、結果をレスポンス
//! DTO に詰め替える。エラーはすべて [`ApiError`](crate::error::ApiError) で返す。

pub mod health;
pub mod input;
pub mod product;
pub mod store;
pub mod user;

pub use health::{
    ReadinessState,
    api_status,
    health_check,
    readiness_check,
    service_info,
};
pub use product::{ProductState, create_product, delete_product, list_products, update_product};
pub use store::{StoreState, create_store, delete_store, get_store, update_store};
pub use user::{UserState, create_user, delete_user, list_users};
