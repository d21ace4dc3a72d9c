use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

// 対話セッションは 1 コマンドずつ逐次実行する
const DEFAULT_MAX_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT_SECS: u64 = 5;
const IDLE_TIMEOUT_SECS: u64 = 600;
const MAX_LIFETIME_SECS: u64 = 1800;

pub const JDBC_URL_KEY: &str = "APP_JDBC_URL";
pub const DB_USER_KEY: &str = "APP_DB_USER";
pub const DB_PASS_KEY: &str = "APP_DB_PASS";
pub const DEV_MODE_KEY: &str = "DEV_MODE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing DB configuration: {}. Provide them as command-line options or environment variables.",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),

    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
}

/// コマンドライン等で明示的に与えられた接続設定（環境変数より優先）
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub jdbc_url: Option<String>,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
}

pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &redacted_url(&self.url))
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 前後の空白を除去し、空文字列は未設定とみなす
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DatabaseConfig {
    /// 明示指定 → 環境変数の順で解決する
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(overrides: &ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, key: &'static str| {
            non_blank(explicit.clone()).or_else(|| non_blank(lookup(key)))
        };

        let url = pick(&overrides.jdbc_url, JDBC_URL_KEY);
        let user = pick(&overrides.db_user, DB_USER_KEY);
        let password = pick(&overrides.db_pass, DB_PASS_KEY);

        match (url, user, password) {
            (Some(url), Some(user), Some(password)) => {
                let config = Self {
                    url: strip_jdbc_prefix(&url).to_string(),
                    user,
                    password,
                };
                config.connect_options()?;
                Ok(config)
            }
            (url, user, password) => {
                let missing = [
                    (url.is_none(), JDBC_URL_KEY),
                    (user.is_none(), DB_USER_KEY),
                    (password.is_none(), DB_PASS_KEY),
                ]
                .into_iter()
                .filter_map(|(absent, key)| absent.then_some(key))
                .collect();
                Err(ConfigError::Missing(missing))
            }
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme in {}",
                redacted_url(&self.url)
            )));
        }

        let options: PgConnectOptions = self.url.parse().map_err(|e: sqlx::Error| {
            ConfigError::InvalidUrl(format!("could not parse {}: {}", redacted_url(&self.url), e))
        })?;

        Ok(options.username(&self.user).password(&self.password))
    }

    pub async fn create_pool(&self) -> anyhow::Result<PgPool> {
        let options = self.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(IDLE_TIMEOUT_SECS))
            .max_lifetime(Duration::from_secs(MAX_LIFETIME_SECS))
            .connect_with(options)
            .await?;

        Ok(pool)
    }
}

/// `jdbc:postgresql://...` 形式も受け付ける
fn strip_jdbc_prefix(url: &str) -> &str {
    url.strip_prefix("jdbc:").unwrap_or(url)
}

/// URL 中の資格情報（`user:pass@`）を伏せ字にする
fn redacted_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let rest = &url[scheme_end..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}***{}", &url[..scheme_end], &rest[at..]),
        None => url.to_string(),
    }
}

/// 開発モード判定: 明示フラグ、または DEV_MODE=true
pub fn is_dev_mode(flag: bool) -> bool {
    dev_mode_from(flag, std::env::var(DEV_MODE_KEY).ok().as_deref())
}

/// 環境変数の値を直接受け取る版
pub fn dev_mode_from(flag: bool, value: Option<&str>) -> bool {
    flag || common::is_truthy(value)
}
