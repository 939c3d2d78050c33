// src/store.rs
//! Storage port for polls, options and votes.
//!
//! Handlers never talk to a database directly. They receive an
//! `Arc<dyn PollStore>` through the router state, so the same request
//! logic runs against Postgres in production and the in-memory store in
//! tests.
//!
//! The one-vote-per-(user, poll) rule belongs to the store: implementations
//! must reject a second vote atomically and report it as
//! [`StoreError::DuplicateVote`], never through a read-then-write check.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewVote, OptionTally, Poll, PollOption, Vote};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The (user_id, poll_id) uniqueness constraint rejected the insert.
    #[error("vote already recorded for this user and poll")]
    DuplicateVote,

    /// The option does not exist or belongs to a different poll.
    #[error("option does not belong to this poll")]
    UnknownOption,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait PollStore: Send + Sync {
    /// Persist a poll and its options in one transaction.
    ///
    /// Options are stored in the given order. Returns the new poll id.
    async fn create_poll(&self, question: &str, options: &[String]) -> Result<i64, StoreError>;

    async fn find_poll(&self, poll_id: i64) -> Result<Option<Poll>, StoreError>;

    /// Look up an option only if it belongs to `poll_id`.
    async fn find_option(
        &self,
        poll_id: i64,
        option_id: i64,
    ) -> Result<Option<PollOption>, StoreError>;

    /// Vote counts for every option of a poll, in creation order.
    ///
    /// Options without votes are included with a count of zero.
    async fn option_tallies(&self, poll_id: i64) -> Result<Vec<OptionTally>, StoreError>;

    /// Insert a vote.
    ///
    /// # Errors
    ///
    /// - `DuplicateVote` if the user already voted on this poll; nothing is written
    /// - `UnknownOption` if the poll does not own `option_id`; nothing is written
    /// - `Database` on any other storage failure
    async fn record_vote(&self, vote: &NewVote) -> Result<Vote, StoreError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
