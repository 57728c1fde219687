//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::ProjectFilter;
use crate::routes::PageContext;
use crate::routes::portfolio::ProjectCard;
use crate::routes::services::ServiceView;
use crate::state::AppState;

/// Services shown on the home page.
const HOME_SERVICES: usize = 6;

/// Featured projects shown on the home page.
const HOME_PROJECTS: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub services: Vec<ServiceView>,
    pub projects: Vec<ProjectCard>,
}

/// Display the home page.
///
/// # Errors
///
/// Returns an error if content cannot be loaded.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse> {
    let services = state.content().list_services(None).await?;
    let projects = state
        .content()
        .list_projects(ProjectFilter {
            expertise: None,
            featured_only: true,
        })
        .await?;

    Ok(HomeTemplate {
        page: PageContext::new(&state, user.as_ref()),
        services: services
            .iter()
            .take(HOME_SERVICES)
            .map(ServiceView::from)
            .collect(),
        projects: projects
            .iter()
            .take(HOME_PROJECTS)
            .map(ProjectCard::from)
            .collect(),
    })
}
