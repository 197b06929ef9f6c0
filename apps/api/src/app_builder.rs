//! # ルーター構築
//!
//! リポジトリと時刻を受け取り、ユースケース → State → Router の順に組み立てる。
//! DB 接続やマイグレーションは呼び出し元（`main`）の責務。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use storehub_domain::clock::Clock;
use storehub_infra::repository::{ProductRepository, StoreRepository, UserRepository};
use storehub_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::AppEnv,
    handler::{
        ProductState,
        ReadinessState,
        StoreState,
        UserState,
        api_status,
        create_product,
        create_store,
        create_user,
        delete_product,
        delete_store,
        delete_user,
        get_store,
        health_check,
        list_products,
        list_users,
        readiness_check,
        service_info,
        update_product,
        update_store,
    },
    middleware::expose_internal_error_detail,
    usecase::{ProductUseCaseImpl, StoreUseCaseImpl, UserUseCaseImpl},
};

/// ルーターが依存するリポジトリ一式
#[derive(Clone)]
pub struct Repositories {
    pub user:    Arc<dyn UserRepository>,
    pub store:   Arc<dyn StoreRepository>,
    pub product: Arc<dyn ProductRepository>,
}

/// 全ルートとミドルウェアを組み立てる
pub fn build_app(
    app_env: AppEnv,
    repositories: Repositories,
    clock: Arc<dyn Clock>,
    readiness_state: Arc<ReadinessState>,
) -> Router {
    let Repositories {
        user: user_repository,
        store: store_repository,
        product: product_repository,
    } = repositories;

    let user_state = Arc::new(UserState {
        usecase: UserUseCaseImpl::new(user_repository.clone(), clock.clone()),
    });
    let store_state = Arc::new(StoreState {
        usecase: StoreUseCaseImpl::new(
            store_repository,
            user_repository,
            product_repository.clone(),
            clock.clone(),
        ),
    });
    let product_state = Arc::new(ProductState {
        usecase: ProductUseCaseImpl::new(product_repository, clock),
    });

    Router::new()
        .route("/", get(service_info))
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/users", get(list_users).post(create_user))
                .route("/users/{id}", delete(delete_user))
                .with_state(user_state),
        )
        .merge(
            Router::new()
                .route("/stores", post(create_store))
                .route(
                    "/stores/{id}",
                    get(get_store).put(update_store).delete(delete_store),
                )
                .with_state(store_state),
        )
        .merge(
            Router::new()
                .route("/products", get(list_products).post(create_product))
                .route("/products/{id}", put(update_product).delete(delete_product))
                .with_state(product_state),
        )
        // 内側から順に適用される
        .layer(from_fn_with_state(app_env, expose_internal_error_detail))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
