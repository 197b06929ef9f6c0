//! 商品管理ユースケース

use std::sync::Arc;

use storehub_domain::{
    clock::Clock,
    product::{NewProduct, Product, ProductId, ProductListing, ProductPatch},
    store::StoreId,
    value_objects::{Price, ProductName},
};
use storehub_infra::repository::ProductRepository;

use crate::error::ApiError;

/// 商品作成の入力
pub struct CreateProductInput {
    pub name:     ProductName,
    pub price:    Price,
    pub store_id: StoreId,
}

/// 商品管理ユースケース
///
/// 存在しないストアの参照は DB の外部キー制約で検出され、400 になる。
pub struct ProductUseCaseImpl {
    product_repository: Arc<dyn ProductRepository>,
    clock:              Arc<dyn Clock>,
}

impl ProductUseCaseImpl {
    pub fn new(product_repository: Arc<dyn ProductRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            product_repository,
            clock,
        }
    }

    pub async fn create_product(&self, input: CreateProductInput) -> Result<Product, ApiError> {
        let product = self
            .product_repository
            .insert(&NewProduct {
                store_id: input.store_id,
                name:     input.name,
                price:    input.price,
                now:      self.clock.now(),
            })
            .await?;

        tracing::info!(product_id = %product.id(), store_id = %product.store_id(), "商品を作成しました");
        Ok(product)
    }

    /// 全商品を所属ストア・所有ユーザー付きで取得する
    pub async fn list_products(&self) -> Result<Vec<ProductListing>, ApiError> {
        Ok(self.product_repository.find_all_with_store().await?)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ApiError> {
        let product = self
            .product_repository
            .update(&id, &patch, self.clock.now())
            .await?;

        tracing::info!(product_id = %id, "商品を更新しました");
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.product_repository.delete(&id).await?;

        tracing::info!(product_id = %id, "商品を削除しました");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use storehub_domain::clock::FixedClock;
    use storehub_infra::mock::MockDatabase;

    use super::*;
    use crate::error::REFERENCED_ID_MISSING;

    fn sut(db: &MockDatabase) -> ProductUseCaseImpl {
        ProductUseCaseImpl::new(
            Arc::new(db.product_repository()),
            Arc::new(FixedClock::new(
                DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            )),
        )
    }

    #[tokio::test]
    async fn test_存在しないストアへの商品作成は400になる() {
        let db = MockDatabase::new();

        let result = sut(&db)
            .create_product(CreateProductInput {
                name:     ProductName::new("Widget").unwrap(),
                price:    "9.99".parse().unwrap(),
                store_id: StoreId::from_db(5),
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::BadRequest(REFERENCED_ID_MISSING.to_string())
        );
    }

    #[tokio::test]
    async fn test_存在しない商品の更新は404になる() {
        let db = MockDatabase::new();

        let result = sut(&db)
            .update_product(ProductId::from_db(1), ProductPatch::default())
            .await;

        assert_eq!(result.unwrap_err(), ApiError::not_found("Product"));
    }

    #[tokio::test]
    async fn test_商品がなければ一覧は空() {
        let db = MockDatabase::new();

        let listings = sut(&db).list_products().await.unwrap();

        assert!(listings.is_empty());
    }
}
