//! # 商品ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /products` - 商品作成
//! - `GET /products` - 商品一覧（所属ストア・所有ユーザー付き、ID 昇順）
//! - `PUT /products/{id}` - 商品の部分更新
//! - `DELETE /products/{id}` - 商品削除
//!
//! `price` と `storeId` は JSON の数値・数値文字列のどちらも受け付ける。

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use storehub_domain::{
    product::{Product, ProductId, ProductListing, ProductPatch},
    store::{StoreId, StoreWithOwner},
    value_objects::{Price, ProductName},
};

use super::{
    input::{NumberOrString, required},
    store::StoreWithUserDto,
};
use crate::{
    error::ApiError,
    usecase::product::{CreateProductInput, ProductUseCaseImpl},
};

/// 商品 API の共有状態
pub struct ProductState {
    pub usecase: ProductUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 商品作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name:     Option<String>,
    pub price:    Option<NumberOrString>,
    pub store_id: Option<NumberOrString>,
}

impl TryFrom<CreateProductRequest> for CreateProductInput {
    type Error = ApiError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name:     ProductName::new(req.name.unwrap_or_default())?,
            price:    required(req.price, "price")?.to_price()?,
            store_id: required(req.store_id, "storeId")?.to_id()?,
        })
    }
}

/// 商品更新リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name:     Option<String>,
    pub price:    Option<NumberOrString>,
    pub store_id: Option<NumberOrString>,
}

impl TryFrom<UpdateProductRequest> for ProductPatch {
    type Error = ApiError;

    fn try_from(req: UpdateProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name:     req.name.map(ProductName::new).transpose()?,
            price:    req.price.as_ref().map(NumberOrString::to_price).transpose()?,
            store_id: req
                .store_id
                .as_ref()
                .map(NumberOrString::to_id::<StoreId>)
                .transpose()?,
        })
    }
}

/// 商品 DTO
///
/// `price` は JSON の数値として出力する。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id:         ProductId,
    pub name:       String,
    pub price:      Price,
    pub store_id:   StoreId,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id:         product.id(),
            name:       product.name().to_string(),
            price:      product.price(),
            store_id:   product.store_id(),
            created_at: product.created_at().to_rfc3339(),
            updated_at: product.updated_at().to_rfc3339(),
        }
    }
}

/// 商品一覧の要素 DTO
#[derive(Debug, Serialize)]
pub struct ProductListingDto {
    #[serde(flatten)]
    pub product: ProductDto,
    pub store:   StoreWithUserDto,
}

impl From<ProductListing> for ProductListingDto {
    fn from(listing: ProductListing) -> Self {
        let product = ProductDto::from(&listing.product);
        let store = StoreWithOwner {
            store: listing.store,
            user:  listing.user,
        };
        Self {
            product,
            store: StoreWithUserDto::from(&store),
        }
    }
}

// --- ハンドラ ---

/// POST /products
///
/// ## レスポンス
///
/// - `201 Created`: 作成した商品
/// - `400 Bad Request`: 入力不正、存在しないストアの参照
pub async fn create_product(
    State(state): State<Arc<ProductState>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let product = state.usecase.create_product(req.try_into()?).await?;

    Ok((StatusCode::CREATED, Json(ProductDto::from(&product))))
}

/// GET /products
pub async fn list_products(
    State(state): State<Arc<ProductState>>,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.usecase.list_products().await?;

    let items: Vec<ProductListingDto> = listings.into_iter().map(ProductListingDto::from).collect();
    Ok(Json(items))
}

/// PUT /products/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の商品
/// - `400 Bad Request`: 入力不正、存在しないストアへの付け替え
/// - `404 Not Found`: 商品が存在しない
pub async fn update_product(
    State(state): State<Arc<ProductState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let id = ProductId::new(id)?;
    let Json(req) = body?;

    let product = state.usecase.update_product(id, req.try_into()?).await?;

    Ok(Json(ProductDto::from(&product)))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<Arc<ProductState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;

    state.usecase.delete_product(ProductId::new(id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}
