//! # ストア
//!
//! ユーザーが所有する店舗。所有ユーザーが削除されると連鎖削除される。

use chrono::{DateTime, Utc};

use crate::{
    product::Product,
    user::{UserId, UserSummary},
    value_objects::StoreName,
};

define_serial_id! {
    /// ストア ID
    pub struct StoreId {
        label: "storeId",
    }
}

/// ストアエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    id:         StoreId,
    user_id:    UserId,
    name:       StoreName,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Store {
    pub fn from_db(
        id: StoreId,
        user_id: UserId,
        name: StoreName,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &StoreName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 新規作成するストア
#[derive(Debug, Clone)]
pub struct NewStore {
    pub user_id: UserId,
    pub name:    StoreName,
    pub now:     DateTime<Utc>,
}

/// ストアの部分更新
///
/// `None` のフィールドは既存値を維持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePatch {
    pub name:    Option<StoreName>,
    pub user_id: Option<UserId>,
}

impl StorePatch {
    /// 既存のストアにパッチを適用した結果を返す
    pub fn apply(&self, store: &Store, now: DateTime<Utc>) -> Store {
        Store {
            id:         store.id,
            user_id:    self.user_id.unwrap_or(store.user_id),
            name:       self.name.clone().unwrap_or_else(|| store.name.clone()),
            created_at: store.created_at,
            updated_at: now,
        }
    }
}

/// 所有ユーザーを埋め込んだストア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWithOwner {
    pub store: Store,
    pub user:  UserSummary,
}

/// ストア詳細（所有ユーザーと商品一覧を含む）
///
/// 商品は作成日時の降順。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDetail {
    pub store:    Store,
    pub user:     UserSummary,
    pub products: Vec<Product>,
}
