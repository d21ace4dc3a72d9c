//! 開発モード用のデータベース初期化

use sqlx::migrate::Migrator;
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const SEED_MOON_MISSIONS: &str = include_str!("../seeds/moon_missions.sql");

/// スキーマを適用し、ミッションが空ならサンプルデータを投入する
pub async fn bootstrap(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM moon_mission")
        .fetch_one(pool)
        .await?;

    if existing == 0 {
        let result = sqlx::query(SEED_MOON_MISSIONS).execute(pool).await?;
        tracing::info!(rows = result.rows_affected(), "seeded moon missions");
    } else {
        tracing::info!(existing, "moon missions already present, skipping seed");
    }

    Ok(())
}
