//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storehub_domain::{
    product::{NewProduct, Product},
    store::{NewStore, Store},
    user::{Email, NewUser, Password, User},
    value_objects::{ProductName, StoreName, UserName},
};
use storehub_infra::repository::{
    PostgresProductRepository,
    PostgresStoreRepository,
    PostgresUserRepository,
    ProductRepository,
    StoreRepository,
    UserRepository,
};

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name:     UserName::new(name).unwrap(),
        email:    Email::new(email).unwrap(),
        password: Password::new("password123").unwrap(),
        now:      test_now(),
    }
}

/// ユーザーを 1 件作成する
pub async fn insert_user(pool: &PgPool, email: &str) -> User {
    PostgresUserRepository::new(pool.clone())
        .insert(&new_user("Test User", email))
        .await
        .expect("ユーザー作成に失敗")
}

/// ストアを 1 件作成する
pub async fn insert_store(pool: &PgPool, user: &User, name: &str) -> Store {
    PostgresStoreRepository::new(pool.clone())
        .insert(&NewStore {
            user_id: user.id(),
            name:    StoreName::new(name).unwrap(),
            now:     test_now(),
        })
        .await
        .expect("ストア作成に失敗")
}

/// 商品を 1 件作成する
pub async fn insert_product(
    pool: &PgPool,
    store: &Store,
    name: &str,
    price: &str,
    now: DateTime<Utc>,
) -> Product {
    PostgresProductRepository::new(pool.clone())
        .insert(&NewProduct {
            store_id: store.id(),
            name: ProductName::new(name).unwrap(),
            price: price.parse().unwrap(),
            now,
        })
        .await
        .expect("商品作成に失敗")
}
