//! Brochure download route handler.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::Result;
use crate::services::brochure::Brochure;
use crate::state::AppState;

/// Render the company brochure as an attachment.
///
/// # Errors
///
/// Returns an error if the document cannot be rendered.
#[instrument(skip(state))]
pub async fn download(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let config = state.config();
    let brochure = Brochure::company(&config.identity, config.base_url.as_str());
    let renderer = state.brochure_renderer();
    let body = renderer.render(&brochure)?;

    tracing::info!(bytes = body.len(), "Brochure rendered");

    Ok((
        [
            (CONTENT_TYPE, renderer.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", renderer.file_name()),
            ),
        ],
        body,
    ))
}
