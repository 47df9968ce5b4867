//! Error taxonomy for the public HTTP surface.
//!
//! Per-adapter failures never reach this type — they are absorbed into
//! `Option::None` inside the orchestrator (see `orchestrator.rs`). Only the
//! three outcomes `spec.md` §7 calls out at the HTTP boundary are
//! represented here.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// Every concurrent task failed to complete before the wall-clock
    /// deadline. Per spec.md §4.1 / §7 this is never actually surfaced to
    /// clients as an error — the orchestrator still returns 200 with
    /// defaults — but the variant exists for the internal plumbing and for
    /// a framework-level 504 if the whole request handler itself is
    /// preempted from outside.
    #[error("upstream services timed out")]
    UpstreamTimeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": code,
        }));

        (status, body).into_response()
    }
}
