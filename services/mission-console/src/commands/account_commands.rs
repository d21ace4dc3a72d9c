use validator::Validate;

use crate::commands::{CommandError, CommandResult};
use crate::domain::{base_username, Account, CreateAccountRequest, NewAccount};
use crate::repository::AccountRepository;

fn validation_message(errors: validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();
    messages.sort();
    messages.join("; ")
}

fn require_non_empty(value: &str, message: &str) -> CommandResult<()> {
    if value.is_empty() {
        return Err(CommandError::Validation(message.to_string()));
    }
    Ok(())
}

/// ログイン（資格情報が一致しなければ None）
pub async fn login(
    repo: &dyn AccountRepository,
    username: &str,
    password: &str,
) -> CommandResult<Option<Account>> {
    require_non_empty(username, "Username cannot be empty.")?;
    require_non_empty(password, "Password cannot be empty.")?;

    Ok(repo.find_by_username_and_password(username, password).await?)
}

/// 既存ユーザー名と衝突しないユーザー名を生成する
///
/// 基底名が使用済みなら基底名に 1, 2, 3 ... を付けて空きを探す。
pub async fn generate_username(
    repo: &dyn AccountRepository,
    first_name: &str,
    last_name: &str,
) -> CommandResult<String> {
    let base = base_username(first_name, last_name);
    let mut candidate = base.clone();
    let mut suffix = 1u32;

    while repo.exists_by_name(&candidate).await? {
        candidate = format!("{}{}", base, suffix);
        suffix += 1;
    }

    Ok(candidate)
}

/// アカウント作成
pub async fn create_account(
    repo: &dyn AccountRepository,
    request: CreateAccountRequest,
) -> CommandResult<Account> {
    // バリデーション
    if let Err(errors) = request.validate() {
        return Err(CommandError::Validation(validation_message(errors)));
    }

    if repo.exists_by_ssn(&request.ssn).await? {
        return Err(CommandError::SsnTaken(request.ssn));
    }

    let name = generate_username(repo, &request.first_name, &request.last_name).await?;

    let account = repo
        .create(NewAccount {
            name,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            ssn: request.ssn,
        })
        .await?;

    tracing::info!(user_id = account.id, name = %account.name, "account created");

    Ok(account)
}

/// 指定 ID のユーザーが存在することを確認する
pub async fn ensure_user_exists(repo: &dyn AccountRepository, user_id: i32) -> CommandResult<()> {
    if !repo.exists_by_user_id(user_id).await? {
        return Err(CommandError::UserNotFound(user_id));
    }
    Ok(())
}

/// パスワード更新（更新できたら true）
///
/// 存在確認は新しいパスワードを尋ねる前に `ensure_user_exists` で行う。
pub async fn update_password(
    repo: &dyn AccountRepository,
    user_id: i32,
    new_password: &str,
) -> CommandResult<bool> {
    require_non_empty(new_password, "Password cannot be empty.")?;

    let updated = repo.update_password(user_id, new_password).await?;
    if updated {
        tracing::info!(user_id, "password updated");
    }

    Ok(updated)
}

/// アカウント削除（削除できたら true）
pub async fn delete_account(repo: &dyn AccountRepository, user_id: i32) -> CommandResult<bool> {
    ensure_user_exists(repo, user_id).await?;

    let deleted = repo.delete_by_id(user_id).await?;
    if deleted {
        tracing::info!(user_id, "account deleted");
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryAccountRepository, RepositoryError, RepositoryResult};
    use async_trait::async_trait;

    /// どの呼び出しもデータベースエラーを返すリポジトリ
    struct UnreachableRepository;

    #[async_trait]
    impl AccountRepository for UnreachableRepository {
        async fn find_by_username_and_password(
            &self,
            _name: &str,
            _password: &str,
        ) -> RepositoryResult<Option<Account>> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn exists_by_ssn(&self, _ssn: &str) -> RepositoryResult<bool> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn exists_by_user_id(&self, _user_id: i32) -> RepositoryResult<bool> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn exists_by_name(&self, _name: &str) -> RepositoryResult<bool> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn create(&self, _account: NewAccount) -> RepositoryResult<Account> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn update_password(
            &self,
            _user_id: i32,
            _new_password: &str,
        ) -> RepositoryResult<bool> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }

        async fn delete_by_id(&self, _user_id: i32) -> RepositoryResult<bool> {
            Err(RepositoryError::DatabaseError("unreachable".to_string()))
        }
    }

    fn request(first: &str, last: &str, ssn: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ssn: ssn.to_string(),
            password: "apollo11".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_account_generates_unique_usernames() {
        let repo = InMemoryAccountRepository::new();

        let first = create_account(&repo, request("Neil", "Armstrong", "1234567890"))
            .await
            .unwrap();
        let second = create_account(&repo, request("Neil", "Armstrong", "123456-7890"))
            .await
            .unwrap();
        let third = create_account(&repo, request("Neil", "Armstrong", "0000000000"))
            .await
            .unwrap();

        assert_eq!(first.name, "NeiArm");
        assert_eq!(second.name, "NeiArm1");
        assert_eq!(third.name, "NeiArm2");
    }

    #[tokio::test]
    async fn test_generate_username_short_names() {
        let repo = InMemoryAccountRepository::new();

        let name = generate_username(&repo, "Al", "Wu").await.unwrap();

        assert_eq!(name, "AlWu");
    }

    #[tokio::test]
    async fn test_create_account_rejects_taken_ssn() {
        let repo = InMemoryAccountRepository::new();
        let _ = create_account(&repo, request("Neil", "Armstrong", "1234567890"))
            .await
            .unwrap();

        let result = create_account(&repo, request("Buzz", "Aldrin", "1234567890")).await;

        assert!(matches!(result, Err(CommandError::SsnTaken(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_storage() {
        let repo = UnreachableRepository;

        for ssn in ["12345", "abcdef1234", "١٢٣٤٥٦٧٨٩٠", "１２３４５６-７８９０"] {
            let result = create_account(&repo, request("Neil", "Armstrong", ssn)).await;
            assert!(matches!(result, Err(CommandError::Validation(_))));
        }

        let result = create_account(&repo, request("", "Armstrong", "1234567890")).await;
        assert!(matches!(result, Err(CommandError::Validation(_))));

        let result = login(&repo, "", "secret").await;
        assert!(matches!(result, Err(CommandError::Validation(_))));

        let result = update_password(&repo, 1, "").await;
        assert!(matches!(result, Err(CommandError::Validation(_))));
    }

    #[tokio::test]
    async fn test_valid_ssn_reaches_storage() {
        let repo = UnreachableRepository;

        let result = create_account(&repo, request("Neil", "Armstrong", "123456-7890")).await;

        assert!(matches!(
            result,
            Err(CommandError::Repository(RepositoryError::DatabaseError(_)))
        ));
    }

    #[tokio::test]
    async fn test_login() {
        let repo = InMemoryAccountRepository::new();
        let created = create_account(&repo, request("Neil", "Armstrong", "1234567890"))
            .await
            .unwrap();

        let ok = login(&repo, "NeiArm", "apollo11").await.unwrap();
        assert_eq!(ok.map(|a| a.id), Some(created.id));

        let wrong = login(&repo, "NeiArm", "wrong").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_update_password_then_login() {
        let repo = InMemoryAccountRepository::new();
        let created = create_account(&repo, request("Neil", "Armstrong", "1234567890"))
            .await
            .unwrap();

        assert!(update_password(&repo, created.id, "eagle").await.unwrap());

        assert!(login(&repo, "NeiArm", "eagle").await.unwrap().is_some());
        assert!(login(&repo, "NeiArm", "apollo11").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_password_unknown_user() {
        let repo = InMemoryAccountRepository::new();

        let exists = ensure_user_exists(&repo, 99).await;
        assert!(matches!(exists, Err(CommandError::UserNotFound(99))));

        assert!(!update_password(&repo, 99, "eagle").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_account() {
        let repo = InMemoryAccountRepository::new();
        let created = create_account(&repo, request("Neil", "Armstrong", "1234567890"))
            .await
            .unwrap();

        assert!(delete_account(&repo, created.id).await.unwrap());

        let again = delete_account(&repo, created.id).await;
        assert!(matches!(again, Err(CommandError::UserNotFound(_))));
    }
}
