pub mod account_commands;
pub mod mission_commands;

pub use account_commands::*;
pub use mission_commands::*;

use std::sync::Arc;
use thiserror::Error;

use crate::repository::{AccountRepository, MoonMissionRepository, RepositoryError};

pub type DynAccountRepository = Arc<dyn AccountRepository>;
pub type DynMoonMissionRepository = Arc<dyn MoonMissionRepository>;

/// メニュー操作の失敗
#[derive(Debug, Error)]
pub enum CommandError {
    /// 入力不正。ストレージには問い合わせていない
    #[error("Invalid input. {0}")]
    Validation(String),

    #[error("An account with ssn: {0} already exists.")]
    SsnTaken(String),

    #[error("No user found with id: {0}")]
    UserNotFound(i32),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// 数値入力を解析する（`what` はエラーメッセージ用の項目名）
pub fn parse_number(input: &str, what: &str) -> CommandResult<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| CommandError::Validation(format!("{} must be a number.", what)))
}
