use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Account, NewAccount};

/// ストレージ層の失敗。どちらも「データベースエラー」として扱う
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// アカウントリポジトリインターフェース
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// ユーザー名とパスワードの完全一致で検索（ログイン専用）
    async fn find_by_username_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> RepositoryResult<Option<Account>>;

    /// SSN の重複チェック
    async fn exists_by_ssn(&self, ssn: &str) -> RepositoryResult<bool>;

    /// ユーザー ID の存在チェック
    async fn exists_by_user_id(&self, user_id: i32) -> RepositoryResult<bool>;

    /// ユーザー名の存在チェック
    async fn exists_by_name(&self, name: &str) -> RepositoryResult<bool>;

    /// アカウントを作成し、採番済みのエンティティを返す
    async fn create(&self, account: NewAccount) -> RepositoryResult<Account>;

    /// パスワードを更新（ちょうど 1 行更新されたら true）
    async fn update_password(&self, user_id: i32, new_password: &str) -> RepositoryResult<bool>;

    /// アカウントを削除（ちょうど 1 行削除されたら true）
    async fn delete_by_id(&self, user_id: i32) -> RepositoryResult<bool>;
}
