//! # StoreHub API サーバー
//!
//! 起動手順:
//!
//! 1. `.env` の読み込みとトレーシング初期化
//! 2. 環境変数から設定を読み込む
//! 3. DB 接続プールの作成とマイグレーション
//! 4. リポジトリを組み立ててルーターを構築し、待ち受けを開始する

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use storehub_api::{
    app_builder::{Repositories, build_app},
    config::ApiConfig,
    handler::{ReadinessState, health::SERVICE_NAME},
};
use storehub_domain::clock::SystemClock;
use storehub_infra::{
    db,
    repository::{PostgresProductRepository, PostgresStoreRepository, PostgresUserRepository},
};
use storehub_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env(SERVICE_NAME))
        .context("トレーシングの初期化に失敗しました")?;
    let _tracing_guard = tracing::info_span!("app", service = SERVICE_NAME).entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        app_env = %config.app_env,
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    let repositories = Repositories {
        user:    Arc::new(PostgresUserRepository::new(pool.clone())),
        store:   Arc::new(PostgresStoreRepository::new(pool.clone())),
        product: Arc::new(PostgresProductRepository::new(pool)),
    };
    let app = build_app(
        config.app_env,
        repositories,
        Arc::new(SystemClock),
        readiness_state,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
