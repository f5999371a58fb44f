//! AI review suggestion route.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::ReviewPrompt;
use crate::state::AppState;

/// Review suggestion response.
#[derive(Debug, Serialize)]
pub struct ReviewSuggestion {
    pub review_suggestion: String,
}

/// Draft a review from the buyer's answers.
///
/// Returns 503 when no Anthropic API key is configured.
#[instrument(skip(state, prompt))]
pub async fn suggest(
    State(state): State<AppState>,
    Json(prompt): Json<ReviewPrompt>,
) -> Result<Json<ReviewSuggestion>> {
    let assistant = state.reviews().ok_or(AppError::ReviewUnavailable)?;
    let review_suggestion = assistant.suggest(&prompt).await?;
    Ok(Json(ReviewSuggestion { review_suggestion }))
}
