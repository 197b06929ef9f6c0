//! StoreRepository 統合テスト

mod common;

use chrono::Duration;
use common::{insert_product, insert_store, insert_user, test_now};
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use storehub_domain::{
    store::{NewStore, StoreId, StorePatch},
    user::UserId,
    value_objects::StoreName,
};
use storehub_infra::{
    InfraErrorKind,
    repository::{PostgresProductRepository, PostgresStoreRepository, ProductRepository, StoreRepository},
};

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないユーザーを参照するストアは外部キー違反になる(pool: PgPool) {
    let sut = PostgresStoreRepository::new(pool);

    let err = sut
        .insert(&NewStore {
            user_id: UserId::from_db(999_999),
            name:    StoreName::new("Ghost Shop").unwrap(),
            now:     test_now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InfraErrorKind::ForeignKeyViolation { constraint } if constraint == "stores_user_id_fkey"
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_with_ownerは所有ユーザーの公開情報を含む(pool: PgPool) {
    let user = insert_user(&pool, "owner@example.com").await;
    let store = insert_store(&pool, &user, "Corner Shop").await;
    let sut = PostgresStoreRepository::new(pool);

    let found = sut.find_with_owner(&store.id()).await.unwrap().unwrap();

    assert_eq!(found.store, store);
    assert_eq!(found.user, user.summary());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_名前のみの更新はユーザーidを維持する(pool: PgPool) {
    let user = insert_user(&pool, "owner@example.com").await;
    let store = insert_store(&pool, &user, "Old Name").await;
    let sut = PostgresStoreRepository::new(pool);
    let later = test_now() + Duration::hours(1);

    let updated = sut
        .update(
            &store.id(),
            &StorePatch {
                name:    Some(StoreName::new("New Name").unwrap()),
                user_id: None,
            },
            later,
        )
        .await
        .unwrap();

    assert_eq!(updated.name().as_str(), "New Name");
    assert_eq!(updated.user_id(), user.id());
    assert_eq!(updated.created_at(), store.created_at());
    assert_eq!(updated.updated_at(), later);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないユーザーへの付け替えは外部キー違反になる(pool: PgPool) {
    let user = insert_user(&pool, "owner@example.com").await;
    let store = insert_store(&pool, &user, "Shop").await;
    let sut = PostgresStoreRepository::new(pool);

    let err = sut
        .update(
            &store.id(),
            &StorePatch {
                name:    None,
                user_id: Some(UserId::from_db(999_999)),
            },
            test_now(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InfraErrorKind::ForeignKeyViolation { .. }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないストアの更新はnot_foundになる(pool: PgPool) {
    let sut = PostgresStoreRepository::new(pool);

    let err = sut
        .update(&StoreId::from_db(999_999), &StorePatch::default(), test_now())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        InfraErrorKind::NotFound { entity: "Store", id } if id == "999999"
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ストア削除で商品が連鎖削除される(pool: PgPool) {
    let user = insert_user(&pool, "owner@example.com").await;
    let store = insert_store(&pool, &user, "Shop").await;
    insert_product(&pool, &store, "Widget", "9.99", test_now()).await;
    let sut = PostgresStoreRepository::new(pool.clone());

    sut.delete(&store.id()).await.unwrap();

    assert!(sut.find_by_id(&store.id()).await.unwrap().is_none());
    let products = PostgresProductRepository::new(pool)
        .find_by_store(&store.id())
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないストアの削除はnot_foundになる(pool: PgPool) {
    let sut = PostgresStoreRepository::new(pool);

    let err = sut.delete(&StoreId::from_db(999_999)).await.unwrap_err();

    assert!(matches!(
        err.kind(),
        InfraErrorKind::NotFound { entity: "Store", .. }
    ));
}
