use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::{Account, MoonMission, NewAccount};
use crate::repository::{
    AccountRepository, MoonMissionRepository, RepositoryError, RepositoryResult,
};

#[derive(Default)]
struct AccountTable {
    rows: BTreeMap<i32, Account>,
    next_id: i32,
}

/// インメモリアカウントリポジトリ（テスト用）
pub struct InMemoryAccountRepository {
    table: RwLock<AccountTable>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(AccountTable {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_username_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> RepositoryResult<Option<Account>> {
        let table = self.table.read().map_err(lock_error)?;

        Ok(table
            .rows
            .values()
            .find(|a| a.name == name && a.password == password)
            .cloned())
    }

    async fn exists_by_ssn(&self, ssn: &str) -> RepositoryResult<bool> {
        let table = self.table.read().map_err(lock_error)?;

        Ok(table.rows.values().any(|a| a.ssn == ssn))
    }

    async fn exists_by_user_id(&self, user_id: i32) -> RepositoryResult<bool> {
        let table = self.table.read().map_err(lock_error)?;

        Ok(table.rows.contains_key(&user_id))
    }

    async fn exists_by_name(&self, name: &str) -> RepositoryResult<bool> {
        let table = self.table.read().map_err(lock_error)?;

        Ok(table.rows.values().any(|a| a.name == name))
    }

    async fn create(&self, account: NewAccount) -> RepositoryResult<Account> {
        let mut table = self.table.write().map_err(lock_error)?;

        // UNIQUE 制約の再現
        if table.rows.values().any(|a| a.name == account.name) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "account name already exists: {}",
                account.name
            )));
        }
        if table.rows.values().any(|a| a.ssn == account.ssn) {
            return Err(RepositoryError::ConstraintViolation(
                "account ssn already exists".to_string(),
            ));
        }

        let id = table.next_id;
        table.next_id += 1;

        let account = account.into_account(id);
        table.rows.insert(id, account.clone());

        Ok(account)
    }

    async fn update_password(&self, user_id: i32, new_password: &str) -> RepositoryResult<bool> {
        let mut table = self.table.write().map_err(lock_error)?;

        match table.rows.get_mut(&user_id) {
            Some(account) => {
                account.password = new_password.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, user_id: i32) -> RepositoryResult<bool> {
        let mut table = self.table.write().map_err(lock_error)?;

        Ok(table.rows.remove(&user_id).is_some())
    }
}

/// インメモリミッションリポジトリ（テスト用、挿入順を保持）
pub struct InMemoryMoonMissionRepository {
    missions: RwLock<Vec<MoonMission>>,
}

impl InMemoryMoonMissionRepository {
    pub fn new() -> Self {
        Self::with_missions(Vec::new())
    }

    pub fn with_missions(missions: Vec<MoonMission>) -> Self {
        Self {
            missions: RwLock::new(missions),
        }
    }
}

impl Default for InMemoryMoonMissionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoonMissionRepository for InMemoryMoonMissionRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<MoonMission>> {
        let missions = self.missions.read().map_err(lock_error)?;

        Ok(missions.clone())
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<MoonMission>> {
        let missions = self.missions.read().map_err(lock_error)?;

        Ok(missions.iter().find(|m| m.id == id).cloned())
    }

    async fn count_by_year(&self, year: i32) -> RepositoryResult<i64> {
        let missions = self.missions.read().map_err(lock_error)?;

        Ok(missions.iter().filter(|m| m.launch_year() == year).count() as i64)
    }

    async fn list_spacecraft(&self) -> RepositoryResult<Vec<String>> {
        let missions = self.missions.read().map_err(lock_error)?;

        Ok(missions.iter().map(|m| m.spacecraft.clone()).collect())
    }
}
