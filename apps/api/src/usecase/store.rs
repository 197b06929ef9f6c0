//! ストア管理ユースケース

use std::sync::Arc;

use storehub_domain::{
    clock::Clock,
    store::{NewStore, Store, StoreDetail, StoreId, StorePatch, StoreWithOwner},
    user::UserId,
    value_objects::StoreName,
};
use storehub_infra::repository::{ProductRepository, StoreRepository, UserRepository};

use crate::error::ApiError;

/// ストア作成の入力
pub struct CreateStoreInput {
    pub name:    StoreName,
    pub user_id: UserId,
}

/// ストア管理ユースケース
pub struct StoreUseCaseImpl {
    store_repository:   Arc<dyn StoreRepository>,
    user_repository:    Arc<dyn UserRepository>,
    product_repository: Arc<dyn ProductRepository>,
    clock:              Arc<dyn Clock>,
}

impl StoreUseCaseImpl {
    pub fn new(
        store_repository: Arc<dyn StoreRepository>,
        user_repository: Arc<dyn UserRepository>,
        product_repository: Arc<dyn ProductRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store_repository,
            user_repository,
            product_repository,
            clock,
        }
    }

    /// ストアを作成する
    ///
    /// 1. 所有ユーザーの存在を確認（なければ 404）
    /// 2. ストアを挿入
    /// 3. 所有ユーザーの公開情報を埋め込んで返す
    pub async fn create_store(&self, input: CreateStoreInput) -> Result<StoreWithOwner, ApiError> {
        let owner = self
            .user_repository
            .find_by_id(&input.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;

        let store = self
            .store_repository
            .insert(&NewStore {
                user_id: input.user_id,
                name:    input.name,
                now:     self.clock.now(),
            })
            .await?;

        tracing::info!(store_id = %store.id(), user_id = %owner.id(), "ストアを作成しました");
        Ok(StoreWithOwner {
            store,
            user: owner.summary(),
        })
    }

    /// ストア詳細（所有ユーザーと商品一覧）を取得する
    pub async fn get_store(&self, id: StoreId) -> Result<StoreDetail, ApiError> {
        let StoreWithOwner { store, user } = self
            .store_repository
            .find_with_owner(&id)
            .await?
            .ok_or_else(|| ApiError::not_found("Store"))?;

        let products = self.product_repository.find_by_store(&id).await?;

        Ok(StoreDetail {
            store,
            user,
            products,
        })
    }

    /// 指定されたフィールドのみ更新する
    pub async fn update_store(&self, id: StoreId, patch: StorePatch) -> Result<Store, ApiError> {
        let store = self
            .store_repository
            .update(&id, &patch, self.clock.now())
            .await?;

        tracing::info!(store_id = %id, "ストアを更新しました");
        Ok(store)
    }

    /// ストアを削除する（商品も連鎖削除）
    pub async fn delete_store(&self, id: StoreId) -> Result<(), ApiError> {
        self.store_repository.delete(&id).await?;

        tracing::info!(store_id = %id, "ストアを削除しました");
        Ok(())
    }
}
