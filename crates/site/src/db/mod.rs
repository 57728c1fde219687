//! Database operations for the site.
//!
//! # Database: `site` schema
//!
//! ## Tables
//!
//! - `account` - Site accounts (username, argon2 hash, staff flag)
//! - `item` - User-owned items
//! - `contact` - Contact form submissions
//! - `team_member`, `service`, `portfolio_project`, `blog_post` - Site content
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! Handlers never touch a pool directly: they go through the repository
//! traits below, implemented once for `PostgreSQL` and once in memory
//! ([`memory::MemoryStore`]) for tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p nexussphere-cli -- migrate
//! ```

pub mod contacts;
pub mod content;
pub mod items;
pub mod memory;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use nexussphere_core::{
    BlogCategory, Expertise, ItemId, ProjectId, Slug, UserId, Username,
};

use crate::models::{
    Account, BlogPost, Contact, Item, ItemChanges, NewAccount, NewBlogPost, NewContact, NewItem,
    NewProject, NewService, NewTeamMember, PortfolioProject, ProjectFilter, Service, TeamMember,
};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_on_unique(what: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        RepositoryError::Database(e)
    }
}

/// Sort order for item listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrder {
    /// Ascending id (insertion order). Used by the HTML list.
    Oldest,
    /// Newest creation time first. Used by the API.
    Newest,
}

/// Storage for [`Item`]s.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list_all(&self, order: ItemOrder) -> Result<Vec<Item>, RepositoryError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    async fn create(&self, item: NewItem) -> Result<Item, RepositoryError>;

    /// Replace the name and description. Returns `None` if the item is gone.
    async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError>;
}

/// Storage for [`Account`]s.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError>;

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError>;

    /// The account together with its password hash, for login.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError>;

    /// Returns [`RepositoryError::Conflict`] when the username is taken.
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError>;
}

/// Storage for contact submissions.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: NewContact) -> Result<Contact, RepositoryError>;

    /// Newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Contact>, RepositoryError>;
}

/// Storage for team, services, portfolio and blog content.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list_team(&self) -> Result<Vec<TeamMember>, RepositoryError>;

    async fn list_services(
        &self,
        expertise: Option<Expertise>,
    ) -> Result<Vec<Service>, RepositoryError>;

    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<PortfolioProject>, RepositoryError>;

    async fn find_project(&self, id: ProjectId)
    -> Result<Option<PortfolioProject>, RepositoryError>;

    /// Published posts only.
    async fn list_published_posts(
        &self,
        category: Option<BlogCategory>,
    ) -> Result<Vec<BlogPost>, RepositoryError>;

    async fn find_published_post(&self, slug: &Slug) -> Result<Option<BlogPost>, RepositoryError>;

    async fn create_team_member(
        &self,
        member: NewTeamMember,
    ) -> Result<TeamMember, RepositoryError>;

    async fn create_service(&self, service: NewService) -> Result<Service, RepositoryError>;

    async fn create_project(
        &self,
        project: NewProject,
    ) -> Result<PortfolioProject, RepositoryError>;

    /// Returns [`RepositoryError::Conflict`] when the slug is taken.
    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, RepositoryError>;
}

/// The full set of repositories used by handlers.
#[derive(Clone)]
pub struct Repositories {
    pub items: Arc<dyn ItemRepository>,
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub content: Arc<dyn ContentRepository>,
}

impl Repositories {
    /// Repositories backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            items: Arc::new(items::PgItemRepository::new(pool.clone())),
            users: Arc::new(users::PgUserRepository::new(pool.clone())),
            contacts: Arc::new(contacts::PgContactRepository::new(pool.clone())),
            content: Arc::new(content::PgContentRepository::new(pool.clone())),
        }
    }

    /// Repositories sharing one in-memory store.
    #[must_use]
    pub fn in_memory(store: &Arc<memory::MemoryStore>) -> Self {
        Self {
            items: store.clone(),
            users: store.clone(),
            contacts: store.clone(),
            content: store.clone(),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
