//! 対話セッション: ログインと番号メニュー
//!
//! セッション状態（入出力とログイン中のアカウント）は `Session` が明示的に保持する。

use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::commands::{self, CommandError, DynAccountRepository, DynMoonMissionRepository};
use crate::domain::{Account, CreateAccountRequest};

const MENU: &str = "\
-----------------------------
1) List moon missions
2) Get moon mission by id
3) Count missions by year
4) Create an account
5) Update password
6) Delete account
0) Exit
-----------------------------";

const DATABASE_ERROR_MESSAGE: &str = "A database error occurred. Please try again.";

#[derive(Debug, Error)]
enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("input closed")]
    InputClosed,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Session<R, W> {
    input: R,
    output: W,
    accounts: DynAccountRepository,
    missions: DynMoonMissionRepository,
    current_user: Option<Account>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        input: R,
        output: W,
        accounts: DynAccountRepository,
        missions: DynMoonMissionRepository,
    ) -> Self {
        Self {
            input,
            output,
            accounts,
            missions,
            current_user: None,
        }
    }

    /// ログイン中のアカウント
    pub fn current_user(&self) -> Option<&Account> {
        self.current_user.as_ref()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// ログイン後にメニューを実行する。入力が尽きたら正常終了
    pub async fn run(&mut self) -> io::Result<()> {
        if self.login().await? {
            self.run_menu().await?;
        }
        Ok(())
    }

    /// ログイン後に宇宙船名を 1 行ずつ出力する
    pub async fn run_spacecraft(&mut self) -> io::Result<()> {
        if !self.login().await? {
            return Ok(());
        }

        let result = commands::list_spacecraft(self.missions.as_ref()).await;
        match result {
            Ok(names) => {
                for name in names {
                    writeln!(self.output, "{}", name)?;
                }
                Ok(())
            }
            Err(err) => self.report(err),
        }
    }

    /// 資格情報が一致するまで繰り返す。入力終端なら false
    pub async fn login(&mut self) -> io::Result<bool> {
        loop {
            let Some(username) = self.prompt("Enter username: ")? else {
                return Ok(false);
            };
            if username.is_empty() {
                writeln!(self.output, "Username cannot be empty.")?;
                continue;
            }

            let Some(password) = self.prompt("Enter password: ")? else {
                return Ok(false);
            };

            let result = commands::login(self.accounts.as_ref(), &username, &password).await;
            match result {
                Ok(Some(account)) => {
                    tracing::info!(user_id = account.id, "login succeeded");
                    writeln!(self.output, "Welcome, {}!", account.first_name)?;
                    self.current_user = Some(account);
                    return Ok(true);
                }
                Ok(None) => {
                    tracing::info!(username = %username, "login rejected");
                    writeln!(self.output, "Invalid username or password")?;
                }
                Err(err) => self.report(err)?,
            }
        }
    }

    /// メニューループ。データベースエラーでは終了しない
    pub async fn run_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let result = self.dispatch(choice.trim()).await;
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(SessionError::InputClosed) => return Ok(()),
                Err(SessionError::Io(err)) => return Err(err),
                Err(SessionError::Command(err)) => self.report(err)?,
            }
        }
    }

    async fn dispatch(&mut self, choice: &str) -> Result<Flow, SessionError> {
        match choice {
            "1" => self.list_missions().await?,
            "2" => self.get_mission_by_id().await?,
            "3" => self.count_missions_by_year().await?,
            "4" => self.create_account().await?,
            "5" => self.update_password().await?,
            "6" => self.delete_account().await?,
            "0" => {
                writeln!(self.output, "Exiting program...")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    async fn list_missions(&mut self) -> Result<(), SessionError> {
        let missions = commands::list_missions(self.missions.as_ref()).await?;
        if missions.is_empty() {
            writeln!(self.output, "No missions found.")?;
        }
        for mission in missions {
            writeln!(
                self.output,
                "{:>4}  {}  {}",
                mission.id, mission.launch_date, mission.spacecraft
            )?;
        }
        Ok(())
    }

    async fn get_mission_by_id(&mut self) -> Result<(), SessionError> {
        let input = self.require_line("Enter mission id: ")?;
        let id = commands::parse_number(&input, "Mission id")?;

        match commands::get_mission(self.missions.as_ref(), id).await? {
            Some(mission) => writeln!(self.output, "{}", commands::mission_details(&mission))?,
            None => writeln!(self.output, "No mission found with id: {}", id)?,
        }
        Ok(())
    }

    async fn count_missions_by_year(&mut self) -> Result<(), SessionError> {
        let input = self.require_line("Enter mission year: ")?;
        let year = commands::parse_number(&input, "Mission year")?;

        let count = commands::count_missions_by_year(self.missions.as_ref(), year).await?;
        writeln!(self.output, "{}", commands::count_message(year, count))?;
        Ok(())
    }

    async fn create_account(&mut self) -> Result<(), SessionError> {
        let request = CreateAccountRequest {
            first_name: self.require_line("Enter a first name: ")?,
            last_name: self.require_line("Enter a last name: ")?,
            ssn: self.require_line("Enter ssn: ")?,
            password: self.require_line("Choose a password: ")?,
        };

        let account = commands::create_account(self.accounts.as_ref(), request).await?;
        writeln!(
            self.output,
            "Account created with username: {} (user id: {})",
            account.name, account.id
        )?;
        Ok(())
    }

    async fn update_password(&mut self) -> Result<(), SessionError> {
        let input = self.require_line("Enter user id: ")?;
        let user_id = commands::parse_number(&input, "User id")?;
        commands::ensure_user_exists(self.accounts.as_ref(), user_id).await?;

        let new_password = self.require_line("Enter a new password: ")?;
        if commands::update_password(self.accounts.as_ref(), user_id, &new_password).await? {
            writeln!(self.output, "Updated password for user with id: {}", user_id)?;
        } else {
            writeln!(self.output, "Failed to update password for user with id: {}", user_id)?;
        }
        Ok(())
    }

    async fn delete_account(&mut self) -> Result<(), SessionError> {
        let input = self.require_line("Enter user id to delete: ")?;
        let user_id = commands::parse_number(&input, "User id")?;

        if commands::delete_account(self.accounts.as_ref(), user_id).await? {
            writeln!(self.output, "Account with id: {} has been deleted", user_id)?;
        } else {
            writeln!(self.output, "Failed to delete account with id: {}", user_id)?;
        }
        Ok(())
    }

    fn report(&mut self, err: CommandError) -> io::Result<()> {
        match err {
            CommandError::Repository(source) => {
                tracing::warn!(error = %source, "database operation failed");
                writeln!(self.output, "{}", DATABASE_ERROR_MESSAGE)
            }
            other => writeln!(self.output, "{}", other),
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn require_line(&mut self, text: &str) -> Result<String, SessionError> {
        self.prompt(text)?.ok_or(SessionError::InputClosed)
    }
}
