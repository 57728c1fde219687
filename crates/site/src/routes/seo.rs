//! `sitemap.xml` and `robots.txt` route handlers.

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};
use tracing::instrument;

use crate::error::Result;
use crate::services::sitemap::{self, SitemapEntry};
use crate::state::AppState;

/// Sitemap template.
#[derive(Template)]
#[template(path = "seo/sitemap.xml")]
pub struct SitemapTemplate {
    pub entries: Vec<SitemapEntry>,
}

/// Robots template.
#[derive(Template)]
#[template(path = "seo/robots.txt")]
pub struct RobotsTemplate {
    pub sitemap_url: String,
}

/// Serve the XML sitemap.
///
/// # Errors
///
/// Returns an error if content cannot be loaded or rendered.
#[instrument(skip(state))]
pub async fn sitemap_xml(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let entries = sitemap::collect(state.content(), state.config()).await?;
    let body = SitemapTemplate { entries }.render()?;
    Ok(([(CONTENT_TYPE, "application/xml; charset=utf-8")], body))
}

/// Serve `robots.txt`.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
#[instrument(skip(state))]
pub async fn robots_txt(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = RobotsTemplate {
        sitemap_url: state.config().absolute_url("/sitemap.xml"),
    }
    .render()?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

/// Create the SEO routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
}
