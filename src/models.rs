// src/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Poll {
    pub id: i64,
    pub question: String,
}

/// One selectable answer. `poll_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PollOption {
    pub id: i64,
    pub text: String,
    pub poll_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub user_id: String,
    pub poll_id: i64,
    pub option_id: i64,
}

/// A vote that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub user_id: String,
    pub poll_id: i64,
    pub option_id: i64,
}

/// Per-option vote count, in option creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OptionTally {
    pub option_id: i64,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: String,
    pub option_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PollCreated {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResults {
    pub id: i64,
    pub question: String,
    pub options: Vec<OptionTally>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
