// src/routes.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use http::{header::CONTENT_TYPE, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::store::PollStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>) -> Self {
        Self { store }
    }
}

pub fn create_routes(store: Arc<dyn PollStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/polls", post(handlers::create_poll))
        .route("/polls/{poll_id}", get(handlers::get_poll))
        .route("/polls/{poll_id}/vote", post(handlers::vote))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(store))
}
