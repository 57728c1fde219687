//! Marketing content: team, services, portfolio and blog.
//!
//! Content is managed through `ns-cli seed` and only read by the site.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use nexussphere_core::{
    BlogCategory, Expertise, PostId, ProjectId, ServiceId, Slug, TeamMemberId, UserId, Username,
};

/// A member of the team page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    /// Display position, lowest first.
    pub order: i32,
}

/// An offered service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: String,
    pub expertise: Expertise,
    /// CSS icon class, e.g. `fas fa-code`.
    pub icon: String,
    pub features: Vec<String>,
    pub price_range: String,
    pub order: i32,
}

/// A portfolio case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioProject {
    pub id: ProjectId,
    pub title: String,
    pub client: String,
    pub description: String,
    pub expertise: Expertise,
    /// Comma-separated technology names.
    pub technologies: String,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PortfolioProject {
    /// Technologies as a trimmed list, skipping empty entries.
    #[must_use]
    pub fn technology_list(&self) -> Vec<&str> {
        split_list(&self.technologies)
    }
}

/// A blog article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub slug: Slug,
    pub excerpt: String,
    /// Trusted HTML written by staff.
    pub content: String,
    pub author: Username,
    pub category: Option<BlogCategory>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Comma-separated tags.
    pub tags: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        split_list(&self.tags)
    }
}

/// Portfolio listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub expertise: Option<Expertise>,
    pub featured_only: bool,
}

/// A team member to insert. Also the YAML shape accepted by `ns-cli seed`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub position: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub order: i32,
}

/// A service to insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub expertise: Expertise,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price_range: String,
    #[serde(default)]
    pub order: i32,
}

/// A portfolio project to insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub client: String,
    pub description: String,
    pub expertise: Expertise,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
}

/// A blog post to insert.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: Slug,
    pub excerpt: String,
    pub content: String,
    pub author: UserId,
    pub category: Option<BlogCategory>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: String,
    pub image_url: Option<String>,
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
