//! Team page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::TeamMember;
use crate::routes::PageContext;
use crate::state::AppState;

/// Team member view for templates.
#[derive(Debug, Clone)]
pub struct MemberView {
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

impl From<TeamMember> for MemberView {
    fn from(member: TeamMember) -> Self {
        Self {
            name: member.name,
            position: member.position,
            bio: member.bio,
            image_url: member.image_url,
            email: member.email,
            linkedin_url: member.linkedin_url,
            github_url: member.github_url,
        }
    }
}

/// Team page template.
#[derive(Template, WebTemplate)]
#[template(path = "team.html")]
pub struct TeamTemplate {
    pub page: PageContext,
    pub members: Vec<MemberView>,
}

/// Display every team member in display order.
///
/// # Errors
///
/// Returns an error if the team cannot be loaded.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse> {
    let members = state.content().list_team().await?;
    Ok(TeamTemplate {
        page: PageContext::new(&state, user.as_ref()),
        members: members.into_iter().map(MemberView::from).collect(),
    })
}
