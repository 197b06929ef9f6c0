//! # ユーザーハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /users` - ユーザー作成
//! - `GET /users` - ユーザー一覧（ID 昇順）
//! - `DELETE /users/{id}` - ユーザー削除（ストア・商品も連鎖削除）
//!
//! パスワードはどのレスポンスにも含めない。

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
    user::{Email, Password, User, UserId, UserSummary},
    value_objects::UserName,
};

use crate::{
    error::ApiError,
    usecase::user::{CreateUserInput, UserUseCaseImpl},
};

/// ユーザー API の共有状態
pub struct UserState {
    pub usecase: UserUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー作成リクエスト
///
/// 欠落と空文字はどちらも「必須」エラーとして扱う。
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name:     Option<String>,
    pub email:    Option<String>,
    pub password: Option<String>,
}

impl TryFrom<CreateUserRequest> for CreateUserInput {
    type Error = ApiError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name:     UserName::new(req.name.unwrap_or_default())?,
            email:    Email::new(req.email.unwrap_or_default())?,
            password: Password::new(req.password.unwrap_or_default())?,
        })
    }
}

/// ユーザー DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id:         UserId,
    pub name:       String,
    pub email:      String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id:         user.id(),
            name:       user.name().to_string(),
            email:      user.email().to_string(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// ストア・商品に埋め込むユーザー DTO
#[derive(Debug, Serialize)]
pub struct UserSummaryDto {
    pub id:    UserId,
    pub name:  String,
    pub email: String,
}

impl From<&UserSummary> for UserSummaryDto {
    fn from(user: &UserSummary) -> Self {
        Self {
            id:    user.id,
            name:  user.name.to_string(),
            email: user.email.to_string(),
        }
    }
}

// --- ハンドラ ---

/// POST /users
///
/// ## レスポンス
///
/// - `201 Created`: 作成したユーザー
/// - `400 Bad Request`: 必須項目の欠落、メールアドレスの形式不正
/// - `409 Conflict`: メールアドレスの重複
pub async fn create_user(
    State(state): State<Arc<UserState>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let user = state.usecase.create_user(req.try_into()?).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<UserState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.usecase.list_users().await?;

    let items: Vec<UserDto> = users.iter().map(UserDto::from).collect();
    Ok(Json(items))
}

/// DELETE /users/{id}
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功
/// - `404 Not Found`: ユーザーが存在しない
pub async fn delete_user(
    State(state): State<Arc<UserState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;

    state.usecase.delete_user(UserId::new(id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::{delete, get},
    };
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use storehub_domain::{clock::FixedClock, user::NewUser};
    use storehub_infra::{InfraError, mock::MockDatabase, repository::UserRepository};
    use tower::ServiceExt;

    use super::*;

    // テスト用スタブ

    struct FailingUserRepository;

    #[async_trait]
    impl UserRepository for FailingUserRepository {
        async fn insert(&self, _user: &NewUser) -> Result<User, InfraError> {
            Err(InfraError::unexpected("connection reset"))
        }

        async fn find_all(&self) -> Result<Vec<User>, InfraError> {
            Err(InfraError::unexpected("connection reset"))
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, InfraError> {
            Err(InfraError::unexpected("connection reset"))
        }

        async fn delete(&self, _id: &UserId) -> Result<(), InfraError> {
            Err(InfraError::unexpected("connection reset"))
        }
    }

    // テストヘルパー

    fn create_test_app(user_repository: Arc<dyn UserRepository>) -> Router {
        let clock = Arc::new(FixedClock::new(
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let state = Arc::new(UserState {
            usecase: UserUseCaseImpl::new(user_repository, clock),
        });
        Router::new()
            .route("/users", get(list_users).post(create_user))
            .route("/users/{id}", delete(delete_user))
            .with_state(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_ユーザー作成は201でパスワードを含まない() {
        // Given
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));

        // When
        let (status, body) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "name": "Alice", "email": "alice@example.com", "password": "pw" })),
        )
        .await;

        // Then
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["createdAt"], "2023-11-14T22:13:20+00:00");
        assert!(body.get("password").is_none());
    }

    #[rstest]
    #[case::名前なし(json!({ "email": "a@example.com", "password": "pw" }), "name is required")]
    #[case::空白のメール(json!({ "name": "A", "email": "  ", "password": "pw" }), "email is required")]
    #[case::パスワードなし(json!({ "name": "A", "email": "a@example.com" }), "password is required")]
    #[case::形式不正(json!({ "name": "A", "email": "not-an-email", "password": "pw" }), "email format is invalid")]
    #[tokio::test]
    async fn test_不正な作成リクエストは400(#[case] body: Value, #[case] detail: &str) {
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));

        let (status, response) = send(&app, Method::POST, "/users", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["detail"], detail);
    }

    #[tokio::test]
    async fn test_メールアドレスの重複は409() {
        // Given
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));
        let body = json!({ "name": "Alice", "email": "dup@example.com", "password": "pw" });
        send(&app, Method::POST, "/users", Some(body.clone())).await;

        // When
        let (status, response) = send(&app, Method::POST, "/users", Some(body)).await;

        // Then
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(response["fields"], json!(["email"]));
    }

    #[tokio::test]
    async fn test_一覧はid昇順() {
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));
        for email in ["b@example.com", "a@example.com"] {
            send(
                &app,
                Method::POST,
                "/users",
                Some(json!({ "name": "U", "email": email, "password": "pw" })),
            )
            .await;
        }

        let (status, body) = send(&app, Method::GET, "/users", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_削除は204で存在しなければ404() {
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));
        send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "name": "A", "email": "a@example.com", "password": "pw" })),
        )
        .await;

        let (first, body) = send(&app, Method::DELETE, "/users/1", None).await;
        let (second, _) = send(&app, Method::DELETE, "/users/1", None).await;

        assert_eq!(first, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert_eq!(second, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("/users/abc")]
    #[case("/users/0")]
    #[tokio::test]
    async fn test_不正なパスidは400(#[case] uri: &str) {
        let app = create_test_app(Arc::new(MockDatabase::new().user_repository()));

        let (status, _) = send(&app, Method::DELETE, uri, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_リポジトリの障害は500() {
        let app = create_test_app(Arc::new(FailingUserRepository));

        let (status, body) = send(&app, Method::GET, "/users", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["title"], "Internal Server Error");
    }
}
