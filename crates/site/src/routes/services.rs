//! Services page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use nexussphere_core::Expertise;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::Service;
use crate::routes::{FilterLink, PageContext};
use crate::state::AppState;

/// Service view for templates.
#[derive(Debug, Clone)]
pub struct ServiceView {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub expertise_label: &'static str,
    pub features: Vec<String>,
    pub price_range: String,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            icon: service.icon.clone(),
            title: service.title.clone(),
            description: service.description.clone(),
            expertise_label: service.expertise.label(),
            features: service.features.clone(),
            price_range: service.price_range.clone(),
        }
    }
}

/// Query parameters for the services page.
#[derive(Debug, Default, Deserialize)]
pub struct ServicesQuery {
    #[serde(rename = "type")]
    pub expertise: Option<String>,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub page: PageContext,
    pub services: Vec<ServiceView>,
    pub filters: Vec<FilterLink>,
    pub active_filter: Option<Expertise>,
}

/// Expertise filter links with `active` marked.
pub(crate) fn expertise_filters(active: Option<Expertise>) -> Vec<FilterLink> {
    Expertise::ALL
        .into_iter()
        .map(|e| FilterLink {
            key: e.key(),
            label: e.label(),
            active: active == Some(e),
        })
        .collect()
}

/// Display services, optionally filtered by expertise.
///
/// An unrecognized `type` is ignored and every service is shown.
///
/// # Errors
///
/// Returns an error if services cannot be loaded.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ServicesQuery>,
) -> Result<impl IntoResponse> {
    let active_filter = query.expertise.as_deref().and_then(|t| t.parse().ok());
    let services = state.content().list_services(active_filter).await?;

    Ok(ServicesTemplate {
        page: PageContext::new(&state, user.as_ref()),
        services: services.iter().map(ServiceView::from).collect(),
        filters: expertise_filters(active_filter),
        active_filter,
    })
}
