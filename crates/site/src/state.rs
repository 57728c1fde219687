//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::db::memory::MemoryStore;
use crate::db::{
    ContactRepository, ContentRepository, ItemRepository, Repositories, UserRepository,
};
use crate::services::brochure::{self, DocumentRenderer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like repositories and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    repositories: Repositories,
    /// Present when running against `PostgreSQL`; used by readiness checks.
    pool: Option<PgPool>,
    brochure: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: SiteConfig, pool: PgPool) -> Self {
        let repositories = Repositories::postgres(&pool);
        Self::build(config, repositories, Some(pool))
    }

    /// State backed by an in-memory store.
    #[must_use]
    pub fn in_memory(config: SiteConfig, store: &Arc<MemoryStore>) -> Self {
        Self::build(config, Repositories::in_memory(store), None)
    }

    fn build(config: SiteConfig, repositories: Repositories, pool: Option<PgPool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repositories,
                pool,
                brochure: brochure::default_renderer(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn items(&self) -> &dyn ItemRepository {
        self.inner.repositories.items.as_ref()
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.repositories.users.as_ref()
    }

    #[must_use]
    pub fn contacts(&self) -> &dyn ContactRepository {
        self.inner.repositories.contacts.as_ref()
    }

    #[must_use]
    pub fn content(&self) -> &dyn ContentRepository {
        self.inner.repositories.content.as_ref()
    }

    /// The database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Renderer selected for brochure downloads.
    #[must_use]
    pub fn brochure_renderer(&self) -> &dyn DocumentRenderer {
        self.inner.brochure.as_ref()
    }
}
