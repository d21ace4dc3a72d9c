use clap::{Parser, Subcommand};
use std::io;
use std::sync::Arc;

use mission_console::commands::{DynAccountRepository, DynMoonMissionRepository};
use mission_console::config::{is_dev_mode, ConfigOverrides, DatabaseConfig};
use mission_console::console::Session;
use mission_console::dev;
use mission_console::repository::{PostgresAccountRepository, PostgresMoonMissionRepository};

#[derive(Parser)]
#[command(name = "moon-mission")]
#[command(about = "Moon mission catalog and account console")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Initialize and seed the database before starting
    #[arg(long, global = true)]
    dev: bool,

    /// Database URL (overrides APP_JDBC_URL)
    #[arg(long, global = true, value_name = "URL")]
    jdbc_url: Option<String>,

    /// Database user (overrides APP_DB_USER)
    #[arg(long, global = true)]
    db_user: Option<String>,

    /// Database password (overrides APP_DB_PASS)
    #[arg(long, global = true)]
    db_pass: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, print the spacecraft names in the catalog and exit
    Spacecraft,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            jdbc_url: self.jdbc_url.clone(),
            db_user: self.db_user.clone(),
            db_pass: self.db_pass.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    common::init_tracing();

    let cli = Cli::parse();

    let config = DatabaseConfig::resolve(&cli.overrides())?;
    tracing::debug!(?config, "resolved database configuration");

    let pool = config.create_pool().await?;

    if is_dev_mode(cli.dev) {
        tracing::info!("development mode: bootstrapping database");
        dev::bootstrap(&pool).await?;
    }

    let accounts: DynAccountRepository = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let missions: DynMoonMissionRepository =
        Arc::new(PostgresMoonMissionRepository::new(pool.clone()));

    let mut session = Session::new(io::stdin().lock(), io::stdout(), accounts, missions);
    match cli.command {
        Some(Commands::Spacecraft) => session.run_spacecraft().await?,
        None => session.run().await?,
    }

    if let Some(account) = session.current_user() {
        tracing::info!(user_id = account.id, "session ended");
    }

    pool.close().await;
    Ok(())
}
