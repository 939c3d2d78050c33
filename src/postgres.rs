// src/postgres.rs
//! PostgreSQL implementation of `PollStore`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

use crate::models::{NewVote, OptionTally, Poll, PollOption, Vote};
use crate::store::{PollStore, StoreError};

#[derive(Clone)]
pub struct PostgresPollStore {
    pool: PgPool,
}

impl PostgresPollStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PollStore for PostgresPollStore {
    async fn create_poll(&self, question: &str, options: &[String]) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let (poll_id,): (i64,) =
            sqlx::query_as("INSERT INTO polls (question) VALUES ($1) RETURNING id")
                .bind(question)
                .fetch_one(&mut *tx)
                .await?;

        // One insert per option keeps BIGSERIAL ids in the caller's order.
        for text in options {
            sqlx::query("INSERT INTO options (text, poll_id) VALUES ($1, $2)")
                .bind(text)
                .bind(poll_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(poll_id)
    }

    async fn find_poll(&self, poll_id: i64) -> Result<Option<Poll>, StoreError> {
        let poll = sqlx::query_as::<_, Poll>("SELECT id, question FROM polls WHERE id = $1")
            .bind(poll_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(poll)
    }

    async fn find_option(
        &self,
        poll_id: i64,
        option_id: i64,
    ) -> Result<Option<PollOption>, StoreError> {
        let option = sqlx::query_as::<_, PollOption>(
            "SELECT id, text, poll_id FROM options WHERE id = $1 AND poll_id = $2",
        )
        .bind(option_id)
        .bind(poll_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(option)
    }

    async fn option_tallies(&self, poll_id: i64) -> Result<Vec<OptionTally>, StoreError> {
        let tallies = sqlx::query_as::<_, OptionTally>(
            r#"
            SELECT o.id AS option_id, o.text, COUNT(v.id) AS votes
            FROM options o
            LEFT JOIN votes v ON v.option_id = o.id
            WHERE o.poll_id = $1
            GROUP BY o.id, o.text
            ORDER BY o.id
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tallies)
    }

    async fn record_vote(&self, vote: &NewVote) -> Result<Vote, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (user_id, poll_id, option_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, poll_id, option_id
            "#,
        )
        .bind(&vote.user_id)
        .bind(vote.poll_id)
        .bind(vote.option_id)
        .fetch_one(&mut *tx)
        .await;

        match result {
            Ok(recorded) => {
                tx.commit().await?;
                Ok(recorded)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                rollback(tx).await;
                Err(StoreError::DuplicateVote)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                rollback(tx).await;
                Err(StoreError::UnknownOption)
            }
            Err(e) => {
                rollback(tx).await;
                Err(StoreError::Database(e))
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// The insert already failed; a rollback error must not replace that outcome.
/// Dropping the transaction rolls it back anyway.
async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        warn!("rollback after failed vote insert failed: {e}");
    }
}
