//! In-memory implementation of every repository trait.
//!
//! Backs the integration tests and local runs without a database. Each table
//! is a `Vec` behind one async `RwLock`; ids are assigned from per-table
//! counters starting at 1, like `SERIAL` columns.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use nexussphere_core::{
    BlogCategory, ContactId, Expertise, ItemId, PostId, ProjectId, ServiceId, Slug, TeamMemberId,
    UserId, Username,
};

use super::{
    ContactRepository, ContentRepository, ItemOrder, ItemRepository, RepositoryError,
    UserRepository,
};
use crate::models::{
    Account, BlogPost, Contact, Item, ItemChanges, ItemOwner, NewAccount, NewBlogPost,
    NewContact, NewItem, NewProject, NewService, NewTeamMember, PortfolioProject, ProjectFilter,
    Service, TeamMember,
};

/// Process-local store implementing all repositories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: NextIds,
    accounts: Vec<(Account, String)>,
    items: Vec<StoredItem>,
    contacts: Vec<Contact>,
    team: Vec<TeamMember>,
    services: Vec<Service>,
    projects: Vec<PortfolioProject>,
    posts: Vec<BlogPost>,
}

#[derive(Debug, Default)]
struct NextIds {
    account: i32,
    item: i32,
    contact: i32,
    team_member: i32,
    service: i32,
    project: i32,
    post: i32,
}

fn bump(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Debug, Clone)]
struct StoredItem {
    id: ItemId,
    name: String,
    description: String,
    created_at: chrono::DateTime<Utc>,
    owner_id: Option<UserId>,
}

impl Tables {
    fn account(&self, id: UserId) -> Option<&Account> {
        self.accounts
            .iter()
            .map(|(account, _)| account)
            .find(|a| a.id == id)
    }

    fn hydrate(&self, stored: &StoredItem) -> Item {
        let owner = stored
            .owner_id
            .and_then(|id| self.account(id))
            .map(|a| ItemOwner {
                id: a.id,
                username: a.username.clone(),
            });

        Item {
            id: stored.id,
            name: stored.name.clone(),
            description: stored.description.clone(),
            created_at: stored.created_at,
            owner,
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn list_all(&self, order: ItemOrder) -> Result<Vec<Item>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut stored: Vec<&StoredItem> = tables.items.iter().collect();
        match order {
            ItemOrder::Oldest => stored.sort_by_key(|i| i.id),
            ItemOrder::Newest => stored.sort_by_key(|i| Reverse((i.created_at, i.id))),
        }
        Ok(stored.into_iter().map(|i| tables.hydrate(i)).collect())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .find(|i| i.id == id)
            .map(|i| tables.hydrate(i)))
    }

    async fn create(&self, item: NewItem) -> Result<Item, RepositoryError> {
        let mut tables = self.tables.write().await;
        let stored = StoredItem {
            id: ItemId::new(bump(&mut tables.next_id.item)),
            name: item.fields.name,
            description: item.fields.description,
            created_at: Utc::now(),
            owner_id: Some(item.owner),
        };
        let hydrated = tables.hydrate(&stored);
        tables.items.push(stored);
        Ok(hydrated)
    }

    async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        stored.name.clone_from(&changes.name);
        stored.description.clone_from(&changes.description);
        let stored = stored.clone();
        Ok(Some(tables.hydrate(&stored)))
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        Ok(tables.items.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.tables.read().await.account(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .find_credentials(username)
            .await?
            .map(|(account, _)| account))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|(a, _)| &a.username == username)
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .iter()
            .any(|(a, _)| a.username == account.username)
        {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let created = Account {
            id: UserId::new(bump(&mut tables.next_id.account)),
            username: account.username,
            email: account.email,
            is_staff: account.is_staff,
            date_joined: Utc::now(),
        };
        tables
            .accounts
            .push((created.clone(), account.password_hash));
        Ok(created)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let mut tables = self.tables.write().await;
        let created = Contact {
            id: ContactId::new(bump(&mut tables.next_id.contact)),
            name: contact.name,
            email: contact.email,
            company: contact.company,
            message: contact.message,
            created_at: Utc::now(),
        };
        tables.contacts.push(created.clone());
        Ok(created)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Contact>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut contacts = tables.contacts.clone();
        contacts.sort_by_key(|c| Reverse((c.created_at, c.id)));
        contacts.truncate(limit);
        Ok(contacts)
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn list_team(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let mut team = self.tables.read().await.team.clone();
        team.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(team)
    }

    async fn list_services(
        &self,
        expertise: Option<Expertise>,
    ) -> Result<Vec<Service>, RepositoryError> {
        let mut services: Vec<Service> = self
            .tables
            .read()
            .await
            .services
            .iter()
            .filter(|s| expertise.is_none_or(|e| s.expertise == e))
            .cloned()
            .collect();
        services.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
        Ok(services)
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<PortfolioProject>, RepositoryError> {
        let mut projects: Vec<PortfolioProject> = self
            .tables
            .read()
            .await
            .projects
            .iter()
            .filter(|p| filter.expertise.is_none_or(|e| p.expertise == e))
            .filter(|p| !filter.featured_only || p.featured)
            .cloned()
            .collect();
        // Dated projects newest first, undated last; then newest created.
        projects.sort_by_key(|p| {
            (
                p.completion_date.is_none(),
                Reverse(p.completion_date),
                Reverse(p.created_at),
            )
        });
        Ok(projects)
    }

    async fn find_project(
        &self,
        id: ProjectId,
    ) -> Result<Option<PortfolioProject>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_published_posts(
        &self,
        category: Option<BlogCategory>,
    ) -> Result<Vec<BlogPost>, RepositoryError> {
        let mut posts: Vec<BlogPost> = self
            .tables
            .read()
            .await
            .posts
            .iter()
            .filter(|p| p.published)
            .filter(|p| category.is_none_or(|c| p.category == Some(c)))
            .cloned()
            .collect();
        posts.sort_by_key(|p| {
            (
                p.published_at.is_none(),
                Reverse(p.published_at),
                Reverse(p.created_at),
            )
        });
        Ok(posts)
    }

    async fn find_published_post(&self, slug: &Slug) -> Result<Option<BlogPost>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.published && &p.slug == slug)
            .cloned())
    }

    async fn create_team_member(
        &self,
        member: NewTeamMember,
    ) -> Result<TeamMember, RepositoryError> {
        let mut tables = self.tables.write().await;
        let created = TeamMember {
            id: TeamMemberId::new(bump(&mut tables.next_id.team_member)),
            name: member.name,
            position: member.position,
            bio: member.bio,
            image_url: member.image_url,
            email: member.email,
            linkedin_url: member.linkedin_url,
            github_url: member.github_url,
            order: member.order,
        };
        tables.team.push(created.clone());
        Ok(created)
    }

    async fn create_service(&self, service: NewService) -> Result<Service, RepositoryError> {
        let mut tables = self.tables.write().await;
        let created = Service {
            id: ServiceId::new(bump(&mut tables.next_id.service)),
            title: service.title,
            description: service.description,
            expertise: service.expertise,
            icon: service.icon,
            features: service.features,
            price_range: service.price_range,
            order: service.order,
        };
        tables.services.push(created.clone());
        Ok(created)
    }

    async fn create_project(
        &self,
        project: NewProject,
    ) -> Result<PortfolioProject, RepositoryError> {
        let mut tables = self.tables.write().await;
        let created = PortfolioProject {
            id: ProjectId::new(bump(&mut tables.next_id.project)),
            title: project.title,
            client: project.client,
            description: project.description,
            expertise: project.expertise,
            technologies: project.technologies,
            image_url: project.image_url,
            live_url: project.live_url,
            github_url: project.github_url,
            featured: project.featured,
            completion_date: project.completion_date,
            created_at: Utc::now(),
        };
        tables.projects.push(created.clone());
        Ok(created)
    }

    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepositoryError::Conflict("slug already exists".to_owned()));
        }
        let author = tables
            .account(post.author)
            .map(|a| a.username.clone())
            .ok_or(RepositoryError::NotFound)?;

        let now = Utc::now();
        let created = BlogPost {
            id: PostId::new(bump(&mut tables.next_id.post)),
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            author,
            category: post.category,
            published: post.published,
            published_at: post.published_at,
            tags: post.tags,
            image_url: post.image_url,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(created.clone());
        Ok(created)
    }
}
