use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod validator;

pub fn router() -> Router<AppState> {
    Router::new().route("/jobs/{id}", get(handler::get_job))
}

/// The finalize event hook lives outside /api/v1: it is addressed by the
/// object-store notification config, not by API clients.
pub fn events_router() -> Router<AppState> {
    Router::new().route("/events/finalize", post(handler::object_finalized))
}
