//! # ユーザー
//!
//! ストアの所有者。メールアドレスは一意（`users_email_key`）。
//!
//! パスワードは受け取った値をそのまま保存し、レスポンスには一切含めない。
//! 他エンティティに埋め込む際は [`UserSummary`]（id, name, email）を使う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, value_objects::UserName};

define_serial_id! {
    /// ユーザー ID
    pub struct UserId {
        label: "userId",
    }
}

/// メールアドレスの最大文字数
const MAX_EMAIL_LENGTH: usize = 255;

/// パスワードの最大文字数
const MAX_PASSWORD_LENGTH: usize = 255;

/// メールアドレス
///
/// `local@domain.tld` 形式の簡易チェックのみ行う:
/// - 空白を含まない
/// - `@` がちょうど 1 つ
/// - ドメイン部の先頭・末尾以外に `.` がある
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::required("email"));
        }
        if value.chars().count() > MAX_EMAIL_LENGTH {
            return Err(DomainError::Validation(format!(
                "email must be at most {MAX_EMAIL_LENGTH} characters"
            )));
        }
        if !is_plausible_email(&value) {
            return Err(DomainError::Validation("email format is invalid".to_string()));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // "a.b" の "." のように、前後に 1 文字以上ある "." が必要
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// パスワード（平文）
///
/// 受け取った値をそのまま保持するため trim しない。
/// `Debug` 出力はマスクし、`Serialize` は実装しない。
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::required("password"));
        }
        if value.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(DomainError::Validation(format!(
                "password must be at most {MAX_PASSWORD_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    name:       UserName,
    email:      Email,
    password:   Password,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// 既存のデータから復元する
    pub fn from_db(
        id: UserId,
        name: UserName,
        email: Email,
        password: Password,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 埋め込み用の要約に変換する
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id:    self.id,
            name:  self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// 新規作成するユーザー（ID は DB が採番する）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name:     UserName,
    pub email:    Email,
    pub password: Password,
    pub now:      DateTime<Utc>,
}

/// ストア・商品に埋め込むユーザーの公開情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id:    UserId,
    pub name:  UserName,
    pub email: Email,
}
