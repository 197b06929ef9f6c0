//! # 商品
//!
//! ストアに属する商品。所属ストアが削除されると連鎖削除される。

use chrono::{DateTime, Utc};

use crate::{
    store::{Store, StoreId},
    user::UserSummary,
    value_objects::{Price, ProductName},
};

define_serial_id! {
    /// 商品 ID
    pub struct ProductId {
        label: "productId",
    }
}

/// 商品エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id:         ProductId,
    store_id:   StoreId,
    name:       ProductName,
    price:      Price,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_db(
        id: ProductId,
        store_id: StoreId,
        name: ProductName,
        price: Price,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            store_id,
            name,
            price,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 新規作成する商品
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: StoreId,
    pub name:     ProductName,
    pub price:    Price,
    pub now:      DateTime<Utc>,
}

/// 商品の部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name:     Option<ProductName>,
    pub price:    Option<Price>,
    pub store_id: Option<StoreId>,
}

impl ProductPatch {
    pub fn apply(&self, product: &Product, now: DateTime<Utc>) -> Product {
        Product {
            id:         product.id,
            store_id:   self.store_id.unwrap_or(product.store_id),
            name:       self.name.clone().unwrap_or_else(|| product.name.clone()),
            price:      self.price.unwrap_or(product.price),
            created_at: product.created_at,
            updated_at: now,
        }
    }
}

/// 一覧表示用の商品（所属ストアとその所有ユーザーを含む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub product: Product,
    pub store:   Store,
    pub user:    UserSummary,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_価格のみのパッチは他のフィールドを維持する() {
        let created = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let later = DateTime::from_timestamp(1_700_000_600, 0).unwrap();
        let product = Product::from_db(
            ProductId::from_db(3),
            StoreId::from_db(2),
            ProductName::new("Widget").unwrap(),
            "9.99".parse().unwrap(),
            created,
            created,
        );
        let patch = ProductPatch {
            price: Some("12.50".parse().unwrap()),
            ..Default::default()
        };

        let updated = patch.apply(&product, later);

        assert_eq!(updated.price().to_string(), "12.5");
        assert_eq!(updated.name().as_str(), "Widget");
        assert_eq!(updated.store_id(), StoreId::from_db(2));
        assert_eq!(updated.updated_at(), later);
    }
}
