// src/db.rs
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
}

/// Create the schema if it does not exist yet. Safe to run on every start.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS polls (
            id BIGSERIAL PRIMARY KEY,
            question TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // (id, poll_id) is unique so votes can reference both columns.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS options (
            id BIGSERIAL PRIMARY KEY,
            text TEXT NOT NULL,
            poll_id BIGINT NOT NULL REFERENCES polls(id),
            CONSTRAINT options_id_poll_key UNIQUE (id, poll_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id BIGSERIAL PRIMARY KEY,
            user_id TEXT NOT NULL,
            poll_id BIGINT NOT NULL REFERENCES polls(id),
            option_id BIGINT NOT NULL,
            CONSTRAINT votes_option_fkey FOREIGN KEY (option_id, poll_id)
                REFERENCES options(id, poll_id),
            CONSTRAINT votes_user_poll_key UNIQUE (user_id, poll_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS options_poll_id_idx ON options (poll_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS votes_option_id_idx ON votes (option_id)")
        .execute(pool)
        .await?;

    info!("database migrations complete");
    Ok(())
}
