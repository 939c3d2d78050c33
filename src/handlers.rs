// src/handlers.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{CreatePollRequest, MessageResponse, PollCreated, PollResults, VoteRequest};
use crate::poll;
use crate::routes::AppState;

/// POST /polls
pub async fn create_poll(
    State(state): State<AppState>,
    Json(payload): Json<CreatePollRequest>,
) -> AppResult<(StatusCode, Json<PollCreated>)> {
    let id = poll::create_poll(state.store.as_ref(), &payload.question, &payload.options).await?;

    Ok((
        StatusCode::CREATED,
        Json(PollCreated {
            id,
            message: "Poll created successfully".to_string(),
        }),
    ))
}

/// GET /polls/{poll_id}
pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
) -> AppResult<Json<PollResults>> {
    let results = poll::get_results(state.store.as_ref(), poll_id).await?;
    Ok(Json(results))
}

/// POST /polls/{poll_id}/vote
pub async fn vote(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
    Json(payload): Json<VoteRequest>,
) -> AppResult<Json<MessageResponse>> {
    poll::cast_vote(
        state.store.as_ref(),
        poll_id,
        &payload.user_id,
        payload.option_id,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Vote cast successfully".to_string(),
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state
        .store
        .ping()
        .await
        .map_err(|e| AppError::Internal(format!("health check failed: {e}")))?;

    Ok(Json(json!({ "status": "ok" })))
}
