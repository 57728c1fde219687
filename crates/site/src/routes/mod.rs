//! HTTP route handlers for the NexusSphere site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Company pages
//! GET  /about, /privacy, /terms, /team
//! GET  /services?type=         - Services, optionally filtered by expertise
//! GET  /portfolio?expertise=&page=
//! GET  /portfolio/{id}
//! GET  /blog?category=&page=
//! GET  /blog/{slug}
//! GET  /contact                - Contact form
//! POST /contact                - Store a submission
//! GET  /brochure               - Company brochure download
//!
//! # SEO
//! GET  /sitemap.xml
//! GET  /robots.txt
//!
//! # Items (mutations require login and ownership)
//! GET  /items                  - List
//! GET  /items/create           - Create form
//! POST /items/create           - Create
//! GET  /items/{id}             - Detail
//! GET  /items/{id}/edit        - Edit form
//! POST /items/{id}/edit        - Update
//! GET  /items/{id}/delete      - Confirm delete
//! POST /items/{id}/delete      - Delete
//!
//! # Auth
//! GET  /auth/login, POST /auth/login
//! GET  /auth/signup, POST /auth/signup
//! POST /auth/logout
//!
//! # JSON API (session or HTTP Basic)
//! GET  /api/items, POST /api/items
//! GET  /api/items/{id}, PUT, PATCH, DELETE
//! ```
//!
//! Trailing slashes are trimmed before routing, so `/items/` and `/items`
//! reach the same handler.

pub mod api;
pub mod auth;
pub mod blog;
pub mod brochure;
pub mod contact;
pub mod home;
pub mod items;
pub mod pages;
pub mod portfolio;
pub mod seo;
pub mod services;
pub mod team;

use std::str::FromStr;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    routing::get,
};
use chrono::{Datelike, Utc};
use tower::Layer;
use tower_http::{
    normalize_path::{NormalizePath, NormalizePathLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tower_sessions::SessionStore;

use crate::error::AppError;
use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::models::{Account, Page};
use crate::state::AppState;

/// Values every page template needs for the layout.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub site_name: String,
    /// Signed-in username, shown in the header.
    pub username: Option<String>,
    pub year: i32,
}

impl PageContext {
    #[must_use]
    pub fn new(state: &AppState, account: Option<&Account>) -> Self {
        Self {
            site_name: state.config().identity.name.clone(),
            username: account.map(|a| a.username.to_string()),
            year: Utc::now().year(),
        }
    }
}

/// A catalog filter link on a listing page.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Previous/next links for a paginated listing.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub number: usize,
    pub total_pages: usize,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginationView {
    /// Links for `page` of the listing at `path`, keeping the active filter.
    #[must_use]
    pub fn new<T>(page: &Page<T>, path: &str, filter: Option<(&str, &str)>) -> Self {
        let url = |number: usize| {
            filter.map_or_else(
                || format!("{path}?page={number}"),
                |(name, value)| format!("{path}?{name}={value}&page={number}"),
            )
        };
        Self {
            number: page.number,
            total_pages: page.total_pages,
            previous_url: page.has_previous().then(|| url(page.number - 1)),
            next_url: page.has_next().then(|| url(page.number + 1)),
        }
    }
}

/// Parse a path segment as an id; anything unparseable is a 404.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("no such id: {raw}")))
}

/// All page, item, auth and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(pages::router())
        .route("/team", get(team::index))
        .route("/services", get(services::index))
        .nest("/portfolio", portfolio::router())
        .nest("/blog", blog::router())
        .route("/contact", get(contact::show).post(contact::submit))
        .route("/brochure", get(brochure::download))
        .merge(seo::router())
        .nest("/items", items::router())
        .nest("/auth", auth::router())
        .nest("/api", api::router())
}

/// The complete application: routes, static files, health checks and the
/// middleware stack, with trailing slashes trimmed before routing.
pub fn app<S>(state: AppState, session_store: S) -> NormalizePath<Router>
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());
    let static_dir = state.config().static_dir.clone();

    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_links_keep_filter() {
        let page = Page::paginate((0..30).collect::<Vec<_>>(), Some("2"), 12).unwrap();
        let view = PaginationView::new(&page, "/portfolio", Some(("expertise", "mobile_apps")));
        assert_eq!(
            view.previous_url.as_deref(),
            Some("/portfolio?expertise=mobile_apps&page=1")
        );
        assert_eq!(
            view.next_url.as_deref(),
            Some("/portfolio?expertise=mobile_apps&page=3")
        );
    }

    #[test]
    fn test_pagination_links_at_edges() {
        let page = Page::paginate(vec![1, 2, 3], None, 10).unwrap();
        let view = PaginationView::new(&page, "/blog", None);
        assert_eq!(view.total_pages, 1);
        assert!(view.previous_url.is_none());
        assert!(view.next_url.is_none());
    }

    #[test]
    fn test_parse_path_id_rejects_garbage() {
        assert!(parse_path_id::<nexussphere_core::ItemId>("12").is_ok());
        assert!(matches!(
            parse_path_id::<nexussphere_core::ItemId>("abc"),
            Err(AppError::NotFound(_))
        ));
    }
}
