//! Seed the site content tables from a YAML file.
//!
//! # File format
//!
//! ```yaml
//! team:
//!   - name: Ada Lovelace
//!     position: CTO
//!     bio: Writes the first programs.
//!     order: 1
//! services:
//!   - title: Custom Web Apps
//!     description: Full-stack builds.
//!     expertise: web_apps
//!     features: [Responsive design, API integration]
//! projects:
//!   - title: Field Data Portal
//!     client: Acme Mining
//!     description: Survey data in the browser.
//!     expertise: geoscience
//!     featured: true
//! posts:
//!   - title: Hello World
//!     excerpt: Our first post.
//!     content: "<p>Welcome!</p>"
//!     author: alice
//!     category: news
//! ```
//!
//! Every section is optional. A post without a `slug` gets one derived from
//! its title; `author` must name an existing account. Published posts
//! without `published_at` are stamped with the current time.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use nexussphere_core::{BlogCategory, Slug, Username};
use nexussphere_site::db::content::PgContentRepository;
use nexussphere_site::db::users::PgUserRepository;
use nexussphere_site::db::{ContentRepository, UserRepository};
use nexussphere_site::models::{NewBlogPost, NewProject, NewService, NewTeamMember};

use super::{CommandError, connect};

/// Top-level seed document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub team: Vec<NewTeamMember>,
    pub services: Vec<NewService>,
    pub projects: Vec<NewProject>,
    pub posts: Vec<SeedPost>,
}

/// A blog post as written in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPost {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    /// Username of the author.
    pub author: String,
    #[serde(default)]
    pub category: Option<BlogCategory>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

const fn default_published() -> bool {
    true
}

/// Counts of inserted rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub team: usize,
    pub services: usize,
    pub projects: usize,
    pub posts: usize,
}

/// Parse a seed document.
pub fn parse(content: &str) -> Result<SeedFile, CommandError> {
    Ok(serde_yaml::from_str(content)?)
}

impl SeedPost {
    /// The slug to store: the given one, or one derived from the title.
    fn resolve_slug(&self) -> Result<Slug, CommandError> {
        match self.slug.as_deref() {
            Some(slug) => Slug::parse(slug),
            None => Slug::from_title(&self.title),
        }
        .map_err(|e| CommandError::Seed(format!("post '{}': {e}", self.title)))
    }
}

/// Insert everything in `seed`.
///
/// Rows are inserted one at a time; an error stops the run and leaves the
/// rows inserted so far in place.
pub async fn load(
    seed: SeedFile,
    users: &dyn UserRepository,
    content: &dyn ContentRepository,
) -> Result<SeedSummary, CommandError> {
    let mut summary = SeedSummary::default();

    for member in seed.team {
        content.create_team_member(member).await?;
        summary.team += 1;
    }
    for service in seed.services {
        content.create_service(service).await?;
        summary.services += 1;
    }
    for project in seed.projects {
        content.create_project(project).await?;
        summary.projects += 1;
    }

    for post in seed.posts {
        let slug = post.resolve_slug()?;
        let username = Username::parse(&post.author)
            .map_err(|e| CommandError::Seed(format!("post '{}': {e}", post.title)))?;
        let author = users.find_by_username(&username).await?.ok_or_else(|| {
            CommandError::Seed(format!("post '{}': no account named {username}", post.title))
        })?;

        let published_at = match (post.published, post.published_at) {
            (true, None) => Some(Utc::now()),
            (_, at) => at,
        };

        content
            .create_post(NewBlogPost {
                title: post.title,
                slug,
                excerpt: post.excerpt,
                content: post.content,
                author: author.id,
                category: post.category,
                published: post.published,
                published_at,
                tags: post.tags,
                image_url: post.image_url,
            })
            .await?;
        summary.posts += 1;
    }

    Ok(summary)
}

/// Seed content from the YAML file at `path`.
pub async fn run(path: &Path) -> Result<(), CommandError> {
    tracing::info!(path = %path.display(), "Loading seed file");

    // Read and validate YAML before connecting to database
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let seed = parse(&raw)?;

    let pool = connect().await?;
    let users = PgUserRepository::new(pool.clone());
    let content = PgContentRepository::new(pool);

    let summary = load(seed, &users, &content).await?;
    tracing::info!(
        team = summary.team,
        services = summary.services,
        projects = summary.projects,
        posts = summary.posts,
        "Seeding complete"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use nexussphere_core::Expertise;
    use nexussphere_site::db::memory::MemoryStore;
    use nexussphere_site::models::{NewAccount, ProjectFilter};

    use super::*;

    const SEED: &str = r"
team:
  - name: Ada Lovelace
    position: CTO
    bio: Writes the first programs.
services:
  - title: Custom Web Apps
    description: Full-stack builds.
    expertise: web_apps
    features: [Responsive design]
projects:
  - title: Field Data Portal
    client: Acme Mining
    description: Survey data in the browser.
    expertise: geoscience
    featured: true
posts:
  - title: Hello World Again
    content: <p>Hi</p>
    author: alice
    category: news
  - title: Draft
    slug: draft-notes
    content: <p>Later</p>
    author: alice
    published: false
";

    async fn store_with_alice() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        UserRepository::create(
            &*store,
            NewAccount {
                username: Username::parse("alice").unwrap(),
                email: None,
                password_hash: "x".to_string(),
                is_staff: false,
            },
        )
        .await
        .unwrap();
        store
    }

    #[test]
    fn test_parse_empty_document() {
        let seed = parse("{}").unwrap();
        assert!(seed.team.is_empty() && seed.posts.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_expertise() {
        let err = parse("services:\n  - {title: X, description: Y, expertise: robotics}\n");
        assert!(matches!(err, Err(CommandError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_load_inserts_every_section() {
        let store = store_with_alice().await;
        let summary = load(parse(SEED).unwrap(), &*store, &*store)
            .await
            .unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                team: 1,
                services: 1,
                projects: 1,
                posts: 2
            }
        );

        let projects = store.list_projects(ProjectFilter::default()).await.unwrap();
        assert_eq!(projects[0].expertise, Expertise::Geoscience);

        let published = store.list_published_posts(None).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug.as_str(), "hello-world-again");
        assert!(published[0].published_at.is_some());
    }

    #[tokio::test]
    async fn test_load_requires_known_author() {
        let store = Arc::new(MemoryStore::new());
        let seed = parse("posts:\n  - {title: Orphan, content: x, author: nobody}\n").unwrap();
        let err = load(seed, &*store, &*store).await.unwrap_err();
        assert!(matches!(err, CommandError::Seed(_)));
    }
}
