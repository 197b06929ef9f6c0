//! # テスト用モックリポジトリ
//!
//! ハンドラテスト・E2E テストで使用するインメモリリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! storehub-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 3 つのリポジトリは [`MockDatabase`] を共有し、PostgreSQL と同じく
//! 一意制約・外部キー制約・連鎖削除を再現する。

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storehub_domain::{
    product::{NewProduct, Product, ProductId, ProductListing, ProductPatch},
    store::{NewStore, Store, StoreId, StorePatch, StoreWithOwner},
    user::{NewUser, User, UserId},
};

use crate::{
    error::InfraError,
    repository::{ProductRepository, StoreRepository, UserRepository},
};

#[derive(Default)]
struct Tables {
    users:           Vec<User>,
    stores:          Vec<Store>,
    products:        Vec<Product>,
    last_user_id:    i64,
    last_store_id:   i64,
    last_product_id: i64,
}

impl Tables {
    fn user_exists(&self, id: UserId) -> bool {
        self.users.iter().any(|u| u.id() == id)
    }

    fn store_exists(&self, id: StoreId) -> bool {
        self.stores.iter().any(|s| s.id() == id)
    }

    fn remove_stores_where(&mut self, pred: impl Fn(&Store) -> bool) {
        let removed: Vec<StoreId> = self
            .stores
            .iter()
            .filter(|s| pred(s))
            .map(Store::id)
            .collect();
        self.stores.retain(|s| !removed.contains(&s.id()));
        self.products.retain(|p| !removed.contains(&p.store_id()));
    }
}

/// インメモリのデータベース
#[derive(Clone, Default)]
pub struct MockDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn user_repository(&self) -> MockUserRepository {
        MockUserRepository { db: self.clone() }
    }

    pub fn store_repository(&self) -> MockStoreRepository {
        MockStoreRepository { db: self.clone() }
    }

    pub fn product_repository(&self) -> MockProductRepository {
        MockProductRepository { db: self.clone() }
    }
}

// ===== MockUserRepository =====

#[derive(Clone)]
pub struct MockUserRepository {
    db: MockDatabase,
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, InfraError> {
        let mut tables = self.db.lock();
        if tables.users.iter().any(|u| u.email() == &user.email) {
            return Err(InfraError::unique_violation("users_email_key"));
        }

        tables.last_user_id += 1;
        let created = User::from_db(
            UserId::from_db(tables.last_user_id),
            user.name.clone(),
            user.email.clone(),
            user.password.clone(),
            user.now,
            user.now,
        );
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        Ok(self.db.lock().users.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        Ok(self.db.lock().users.iter().find(|u| u.id() == *id).cloned())
    }

    async fn delete(&self, id: &UserId) -> Result<(), InfraError> {
        let mut tables = self.db.lock();
        if !tables.user_exists(*id) {
            return Err(InfraError::not_found("User", id));
        }
        tables.users.retain(|u| u.id() != *id);
        tables.remove_stores_where(|s| s.user_id() == *id);
        Ok(())
    }
}

// ===== MockStoreRepository =====

#[derive(Clone)]
pub struct MockStoreRepository {
    db: MockDatabase,
}

#[async_trait]
impl StoreRepository for MockStoreRepository {
    async fn insert(&self, store: &NewStore) -> Result<Store, InfraError> {
        let mut tables = self.db.lock();
        if !tables.user_exists(store.user_id) {
            return Err(InfraError::foreign_key_violation("stores_user_id_fkey"));
        }

        tables.last_store_id += 1;
        let created = Store::from_db(
            StoreId::from_db(tables.last_store_id),
            store.user_id,
            store.name.clone(),
            store.now,
            store.now,
        );
        tables.stores.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, InfraError> {
        Ok(self.db.lock().stores.iter().find(|s| s.id() == *id).cloned())
    }

    async fn find_with_owner(&self, id: &StoreId) -> Result<Option<StoreWithOwner>, InfraError> {
        let tables = self.db.lock();
        let Some(store) = tables.stores.iter().find(|s| s.id() == *id) else {
            return Ok(None);
        };
        Ok(tables
            .users
            .iter()
            .find(|u| u.id() == store.user_id())
            .map(|u| StoreWithOwner {
                store: store.clone(),
                user:  u.summary(),
            }))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Store>, InfraError> {
        Ok(self
            .db
            .lock()
            .stores
            .iter()
            .filter(|s| s.user_id() == *user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &StoreId,
        patch: &StorePatch,
        now: DateTime<Utc>,
    ) -> Result<Store, InfraError> {
        let mut tables = self.db.lock();
        let Some(index) = tables.stores.iter().position(|s| s.id() == *id) else {
            return Err(InfraError::not_found("Store", id));
        };
        if let Some(user_id) = patch.user_id
            && !tables.user_exists(user_id)
        {
            return Err(InfraError::foreign_key_violation("stores_user_id_fkey"));
        }

        let updated = patch.apply(&tables.stores[index], now);
        tables.stores[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &StoreId) -> Result<(), InfraError> {
        let mut tables = self.db.lock();
        if !tables.store_exists(*id) {
            return Err(InfraError::not_found("Store", id));
        }
        tables.remove_stores_where(|s| s.id() == *id);
        Ok(())
    }
}

// ===== MockProductRepository =====

#[derive(Clone)]
pub struct MockProductRepository {
    db: MockDatabase,
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn insert(&self, product: &NewProduct) -> Result<Product, InfraError> {
        let mut tables = self.db.lock();
        if !tables.store_exists(product.store_id) {
            return Err(InfraError::foreign_key_violation("products_store_id_fkey"));
        }

        tables.last_product_id += 1;
        let created = Product::from_db(
            ProductId::from_db(tables.last_product_id),
            product.store_id,
            product.name.clone(),
            product.price,
            product.now,
            product.now,
        );
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn find_all_with_store(&self) -> Result<Vec<ProductListing>, InfraError> {
        let tables = self.db.lock();
        let listings = tables
            .products
            .iter()
            .filter_map(|p| {
                let store = tables.stores.iter().find(|s| s.id() == p.store_id())?;
                let user = tables.users.iter().find(|u| u.id() == store.user_id())?;
                Some(ProductListing {
                    product: p.clone(),
                    store:   store.clone(),
                    user:    user.summary(),
                })
            })
            .collect();
        Ok(listings)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, InfraError> {
        Ok(self.db.lock().products.iter().find(|p| p.id() == *id).cloned())
    }

    async fn find_by_store(&self, store_id: &StoreId) -> Result<Vec<Product>, InfraError> {
        let mut products: Vec<Product> = self
            .db
            .lock()
            .products
            .iter()
            .filter(|p| p.store_id() == *store_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(products)
    }

    async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> Result<Product, InfraError> {
        let mut tables = self.db.lock();
        let Some(index) = tables.products.iter().position(|p| p.id() == *id) else {
            return Err(InfraError::not_found("Product", id));
        };
        if let Some(store_id) = patch.store_id
            && !tables.store_exists(store_id)
        {
            return Err(InfraError::foreign_key_violation("products_store_id_fkey"));
        }

        let updated = patch.apply(&tables.products[index], now);
        tables.products[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), InfraError> {
        let mut tables = self.db.lock();
        if !tables.products.iter().any(|p| p.id() == *id) {
            return Err(InfraError::not_found("Product", id));
        }
        tables.products.retain(|p| p.id() != *id);
        Ok(())
    }
}
