//! Portfolio route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use nexussphere_core::{Expertise, ProjectId};

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{Page, PortfolioProject, ProjectFilter};
use crate::routes::services::expertise_filters;
use crate::routes::{FilterLink, PageContext, PaginationView, parse_path_id};
use crate::state::AppState;

/// Projects per listing page.
pub const PROJECTS_PER_PAGE: usize = 12;

/// Compact project view for listings and the home page.
#[derive(Debug, Clone)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub title: String,
    pub client: String,
    pub expertise_label: &'static str,
    pub image_url: Option<String>,
}

impl From<&PortfolioProject> for ProjectCard {
    fn from(project: &PortfolioProject) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            client: project.client.clone(),
            expertise_label: project.expertise.label(),
            image_url: project.image_url.clone(),
        }
    }
}

/// Full project view for the detail page.
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub title: String,
    pub client: String,
    pub description: String,
    pub expertise_label: &'static str,
    pub technologies: Vec<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    /// e.g. "March 2025"
    pub completion_date: Option<String>,
}

impl From<&PortfolioProject> for ProjectView {
    fn from(project: &PortfolioProject) -> Self {
        Self {
            title: project.title.clone(),
            client: project.client.clone(),
            description: project.description.clone(),
            expertise_label: project.expertise.label(),
            technologies: project
                .technology_list()
                .into_iter()
                .map(String::from)
                .collect(),
            image_url: project.image_url.clone(),
            live_url: project.live_url.clone(),
            github_url: project.github_url.clone(),
            completion_date: project
                .completion_date
                .map(|d| d.format("%B %Y").to_string()),
        }
    }
}

/// Query parameters for the portfolio listing.
#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub expertise: Option<String>,
    pub page: Option<String>,
}

/// Portfolio listing template.
#[derive(Template, WebTemplate)]
#[template(path = "portfolio/list.html")]
pub struct PortfolioListTemplate {
    pub page: PageContext,
    pub projects: Vec<ProjectCard>,
    pub filters: Vec<FilterLink>,
    pub active_filter: Option<Expertise>,
    pub pagination: PaginationView,
}

/// Portfolio detail template.
#[derive(Template, WebTemplate)]
#[template(path = "portfolio/detail.html")]
pub struct PortfolioDetailTemplate {
    pub page: PageContext,
    pub project: ProjectView,
}

/// Display one page of portfolio projects.
///
/// # Errors
///
/// Returns 404 for a page past the end or a non-numeric page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<PortfolioQuery>,
) -> Result<impl IntoResponse> {
    let active_filter: Option<Expertise> =
        query.expertise.as_deref().and_then(|e| e.parse().ok());
    let projects = state
        .content()
        .list_projects(ProjectFilter {
            expertise: active_filter,
            featured_only: false,
        })
        .await?;

    let listing = Page::paginate(projects, query.page.as_deref(), PROJECTS_PER_PAGE)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    let pagination = PaginationView::new(
        &listing,
        "/portfolio",
        active_filter.map(|e| ("expertise", e.key())),
    );

    Ok(PortfolioListTemplate {
        page: PageContext::new(&state, user.as_ref()),
        projects: listing.items.iter().map(ProjectCard::from).collect(),
        filters: expertise_filters(active_filter),
        active_filter,
        pagination,
    })
}

/// Display a single project.
///
/// # Errors
///
/// Returns 404 if the project doesn't exist.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: ProjectId = parse_path_id(&id)?;
    let project = state
        .content()
        .find_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {id}")))?;

    Ok(PortfolioDetailTemplate {
        page: PageContext::new(&state, user.as_ref()),
        project: ProjectView::from(&project),
    })
}

/// Create the portfolio routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show))
}
