use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::{Account, MoonMission, NewAccount};
use crate::repository::{
    AccountRepository, MoonMissionRepository, RepositoryError, RepositoryResult,
};

/// SQLx の行を表す中間型（domain 層と SQLx の結合を回避）
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    user_id: i32,
    name: String,
    password: String,
    first_name: String,
    last_name: String,
    ssn: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.user_id,
            name: row.name,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            ssn: row.ssn,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MoonMissionRow {
    mission_id: i32,
    spacecraft: String,
    launch_date: NaiveDate,
    carrier_rocket: Option<String>,
    operator: Option<String>,
    mission_type: Option<String>,
    outcome: Option<String>,
}

impl From<MoonMissionRow> for MoonMission {
    fn from(row: MoonMissionRow) -> Self {
        MoonMission {
            id: row.mission_id,
            spacecraft: row.spacecraft,
            launch_date: row.launch_date,
            carrier_rocket: row.carrier_rocket,
            operator: row.operator,
            mission_type: row.mission_type,
            outcome: row.outcome,
        }
    }
}

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        // SQLSTATE クラス 23 = 整合性制約違反
        sqlx::Error::Database(db_err)
            if db_err.code().is_some_and(|code| code.starts_with("23")) =>
        {
            RepositoryError::ConstraintViolation(db_err.message().to_string())
        }
        _ => RepositoryError::DatabaseError(err.to_string()),
    }
}

/// PostgreSQL アカウントリポジトリ
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_username_and_password(
        &self,
        name: &str,
        password: &str,
    ) -> RepositoryResult<Option<Account>> {
        tracing::debug!(name, "looking up account credentials");

        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT user_id, name, password, first_name, last_name, ssn FROM account WHERE name = $1 AND password = $2",
        )
        .bind(name)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Account::from))
    }

    async fn exists_by_ssn(&self, ssn: &str) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM account WHERE ssn = $1)")
            .bind(ssn)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn exists_by_user_id(&self, user_id: i32) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM account WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn exists_by_name(&self, name: &str) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM account WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create(&self, account: NewAccount) -> RepositoryResult<Account> {
        let user_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO account (name, password, first_name, last_name, ssn)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id
            "#,
        )
        .bind(&account.name)
        .bind(&account.password)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.ssn)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        tracing::debug!(user_id, name = %account.name, "account inserted");

        Ok(account.into_account(user_id))
    }

    async fn update_password(&self, user_id: i32, new_password: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("UPDATE account SET password = $1 WHERE user_id = $2")
            .bind(new_password)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_id(&self, user_id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM account WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

/// PostgreSQL ミッションリポジトリ
pub struct PostgresMoonMissionRepository {
    pool: PgPool,
}

impl PostgresMoonMissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MoonMissionRepository for PostgresMoonMissionRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<MoonMission>> {
        let rows = sqlx::query_as::<_, MoonMissionRow>(
            "SELECT mission_id, spacecraft, launch_date, carrier_rocket, operator, mission_type, outcome FROM moon_mission ORDER BY mission_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MoonMission::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<MoonMission>> {
        let row = sqlx::query_as::<_, MoonMissionRow>(
            "SELECT mission_id, spacecraft, launch_date, carrier_rocket, operator, mission_type, outcome FROM moon_mission WHERE mission_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MoonMission::from))
    }

    async fn count_by_year(&self, year: i32) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM moon_mission WHERE EXTRACT(YEAR FROM launch_date)::int = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_spacecraft(&self) -> RepositoryResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT spacecraft FROM moon_mission ORDER BY mission_id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
