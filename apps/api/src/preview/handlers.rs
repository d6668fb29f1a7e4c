//! Axum route handlers for the preview API.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::{ResumeInput, ResumeRecord};
use crate::preview::normalize;
use crate::preview::validation::validate_contact;
use crate::state::AppState;

/// POST /api/generate-resume
///
/// Normalizes the submitted form into the canonical record the UI renders.
pub async fn handle_generate_preview(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResumeInput>,
) -> Result<Json<ResumeRecord>, AppError> {
    let record = normalize(input);
    validate_contact(&record, state.config.contact_policy)?;

    info!(
        skills = record.skills.len(),
        experience = record.experience.len(),
        "Generated resume preview"
    );

    Ok(Json(record))
}
