//! # ストアハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /stores` - ストア作成（所有ユーザーを埋め込んで返す）
//! - `GET /stores/{id}` - ストア詳細（所有ユーザー・商品一覧付き）
//! - `PUT /stores/{id}` - ストアの部分更新
//! - `DELETE /stores/{id}` - ストア削除（商品も連鎖削除）

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
    store::{Store, StoreDetail, StoreId, StorePatch, StoreWithOwner},
    user::UserId,
    value_objects::StoreName,
};

use super::{
    input::{NumberOrString, required},
    product::ProductDto,
    user::UserSummaryDto,
};
use crate::{
    error::ApiError,
    usecase::store::{CreateStoreInput, StoreUseCaseImpl},
};

/// ストア API の共有状態
pub struct StoreState {
    pub usecase: StoreUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// ストア作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name:    Option<String>,
    pub user_id: Option<NumberOrString>,
}

impl TryFrom<CreateStoreRequest> for CreateStoreInput {
    type Error = ApiError;

    fn try_from(req: CreateStoreRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name:    StoreName::new(req.name.unwrap_or_default())?,
            user_id: required(req.user_id, "userId")?.to_id()?,
        })
    }
}

/// ストア更新リクエスト
///
/// 省略したフィールドは現在の値を維持する。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub name:    Option<String>,
    pub user_id: Option<NumberOrString>,
}

impl TryFrom<UpdateStoreRequest> for StorePatch {
    type Error = ApiError;

    fn try_from(req: UpdateStoreRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name:    req.name.map(StoreName::new).transpose()?,
            user_id: req
                .user_id
                .map(|value| value.to_id::<UserId>())
                .transpose()?,
        })
    }
}

/// ストア DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDto {
    pub id:         StoreId,
    pub name:       String,
    pub user_id:    UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Store> for StoreDto {
    fn from(store: &Store) -> Self {
        Self {
            id:         store.id(),
            name:       store.name().to_string(),
            user_id:    store.user_id(),
            created_at: store.created_at().to_rfc3339(),
            updated_at: store.updated_at().to_rfc3339(),
        }
    }
}

/// 所有ユーザー付きストア DTO
#[derive(Debug, Serialize)]
pub struct StoreWithUserDto {
    #[serde(flatten)]
    pub store: StoreDto,
    pub user:  UserSummaryDto,
}

impl From<&StoreWithOwner> for StoreWithUserDto {
    fn from(value: &StoreWithOwner) -> Self {
        Self {
            store: StoreDto::from(&value.store),
            user:  UserSummaryDto::from(&value.user),
        }
    }
}

/// ストア詳細 DTO
#[derive(Debug, Serialize)]
pub struct StoreDetailDto {
    #[serde(flatten)]
    pub store:    StoreDto,
    pub user:     UserSummaryDto,
    pub products: Vec<ProductDto>,
}

impl From<&StoreDetail> for StoreDetailDto {
    fn from(detail: &StoreDetail) -> Self {
        Self {
            store:    StoreDto::from(&detail.store),
            user:     UserSummaryDto::from(&detail.user),
            products: detail.products.iter().map(ProductDto::from).collect(),
        }
    }
}

// --- ハンドラ ---

/// POST /stores
///
/// ## レスポンス
///
/// - `201 Created`: 作成したストア（`user` に所有ユーザー）
/// - `400 Bad Request`: 必須項目の欠落、`userId` が整数でない
/// - `404 Not Found`: 所有ユーザーが存在しない
pub async fn create_store(
    State(state): State<Arc<StoreState>>,
    body: Result<Json<CreateStoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let created = state.usecase.create_store(req.try_into()?).await?;

    Ok((StatusCode::CREATED, Json(StoreWithUserDto::from(&created))))
}

/// GET /stores/{id}
///
/// 商品は作成日時の降順。
pub async fn get_store(
    State(state): State<Arc<StoreState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;

    let detail = state.usecase.get_store(StoreId::new(id)?).await?;

    Ok(Json(StoreDetailDto::from(&detail)))
}

/// PUT /stores/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のストア
/// - `400 Bad Request`: 入力不正、存在しないユーザーへの付け替え
/// - `404 Not Found`: ストアが存在しない
pub async fn update_store(
    State(state): State<Arc<StoreState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateStoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let id = StoreId::new(id)?;
    let Json(req) = body?;

    let store = state.usecase.update_store(id, req.try_into()?).await?;

    Ok(Json(StoreDto::from(&store)))
}

/// DELETE /stores/{id}
pub async fn delete_store(
    State(state): State<Arc<StoreState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;

    state.usecase.delete_store(StoreId::new(id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}
