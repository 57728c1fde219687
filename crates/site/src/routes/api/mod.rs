//! JSON API route handlers.
//!
//! Reads are open to everyone. Writes authenticate with the browser session
//! or HTTP Basic credentials (see [`crate::middleware::ApiUser`]). Errors use
//! [`crate::error::ApiError`].

pub mod items;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the API routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list).post(items::create))
        .route(
            "/items/{id}",
            get(items::retrieve)
                .put(items::replace)
                .patch(items::partial_update)
                .delete(items::destroy),
        )
}
