// src/poll.rs
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{NewVote, PollResults};
use crate::store::{PollStore, StoreError};

pub async fn create_poll(
    store: &dyn PollStore,
    question: &str,
    options: &[String],
) -> AppResult<i64> {
    if question.trim().is_empty() {
        return Err(AppError::InvalidInput("Question must not be empty".to_string()));
    }
    if options.is_empty() {
        return Err(AppError::InvalidInput(
            "A poll needs at least one option".to_string(),
        ));
    }

    let poll_id = store.create_poll(question, options).await?;
    info!(poll_id, options = options.len(), "poll created");

    Ok(poll_id)
}

pub async fn get_results(store: &dyn PollStore, poll_id: i64) -> AppResult<PollResults> {
    let poll = store
        .find_poll(poll_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    let options = store.option_tallies(poll.id).await?;

    Ok(PollResults {
        id: poll.id,
        question: poll.question,
        options,
    })
}

/// Checks run in order: poll exists, option belongs to the poll, then the
/// insert. Duplicate detection is left entirely to the store.
pub async fn cast_vote(
    store: &dyn PollStore,
    poll_id: i64,
    user_id: &str,
    option_id: i64,
) -> AppResult<()> {
    if store.find_poll(poll_id).await?.is_none() {
        return Err(AppError::NotFound("Poll not found".to_string()));
    }

    if store.find_option(poll_id, option_id).await?.is_none() {
        return Err(AppError::InvalidInput(
            "Invalid option for this poll".to_string(),
        ));
    }

    let vote = NewVote {
        user_id: user_id.to_string(),
        poll_id,
        option_id,
    };

    match store.record_vote(&vote).await {
        Ok(recorded) => {
            info!(poll_id, option_id, vote_id = recorded.id, "vote recorded");
            Ok(())
        }
        Err(StoreError::DuplicateVote) => {
            warn!(poll_id, user_id, "duplicate vote rejected");
            Err(StoreError::DuplicateVote.into())
        }
        Err(e) => Err(e.into()),
    }
}
