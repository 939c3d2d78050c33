// src/lib.rs
//! Polling service: create polls, cast one vote per user per poll, read tallies.
//!
//! Storage sits behind the [`store::PollStore`] port. Production runs on
//! [`postgres::PostgresPollStore`]; tests use [`memory::InMemoryPollStore`].

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod poll;
pub mod postgres;
pub mod routes;
pub mod store;
