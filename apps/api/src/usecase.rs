//! # ユースケース層
//!
//! ハンドラから呼ばれ、リポジトリを組み合わせて 1 リクエスト分の処理を行う。
//! リポジトリと時刻は `Arc<dyn ...>` で注入する。

pub mod product;
pub mod store;
pub mod user;

pub use product::{CreateProductInput, ProductUseCaseImpl};
pub use store::{CreateStoreInput, StoreUseCaseImpl};
pub use user::{CreateUserInput, UserUseCaseImpl};
