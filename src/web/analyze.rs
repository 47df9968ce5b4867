//! `POST /api/analyze` (spec.md §3, §6): the single public operation.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::domain::{AnalyzeRequest, AnalyzeResponse};
use crate::error::AppError;
use crate::orchestrator;

use super::AppState;

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let validated = request.validate().inspect_err(|err| {
        warn!(error = %err, "rejected malformed analyze request");
    })?;

    let response = orchestrator::analyze(&state.config, &state.clients, validated).await?;

    Ok(Json(response))
}
