//! `PostgreSQL` content repository (team, services, portfolio, blog).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use nexussphere_core::{
    BlogCategory, Expertise, PostId, ProjectId, ServiceId, Slug, TeamMemberId, Username,
};

use super::{ContentRepository, RepositoryError, conflict_on_unique};
use crate::models::{
    BlogPost, NewBlogPost, NewProject, NewService, NewTeamMember, PortfolioProject,
    ProjectFilter, Service, TeamMember,
};

fn parse_expertise(raw: &str) -> Result<Expertise, RepositoryError> {
    raw.parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid expertise in database: {e}")))
}

#[derive(sqlx::FromRow)]
struct TeamMemberRow {
    id: i32,
    name: String,
    position: String,
    bio: String,
    image_url: Option<String>,
    email: Option<String>,
    linkedin_url: Option<String>,
    github_url: Option<String>,
    display_order: i32,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: TeamMemberId::new(row.id),
            name: row.name,
            position: row.position,
            bio: row.bio,
            image_url: row.image_url,
            email: row.email,
            linkedin_url: row.linkedin_url,
            github_url: row.github_url,
            order: row.display_order,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    title: String,
    description: String,
    expertise: String,
    icon: String,
    features: Vec<String>,
    price_range: String,
    display_order: i32,
}

impl TryFrom<ServiceRow> for Service {
    type Error = RepositoryError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ServiceId::new(row.id),
            title: row.title,
            description: row.description,
            expertise: parse_expertise(&row.expertise)?,
            icon: row.icon,
            features: row.features,
            price_range: row.price_range,
            order: row.display_order,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    title: String,
    client: String,
    description: String,
    expertise: String,
    technologies: String,
    image_url: Option<String>,
    live_url: Option<String>,
    github_url: Option<String>,
    featured: bool,
    completion_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for PortfolioProject {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProjectId::new(row.id),
            title: row.title,
            client: row.client,
            description: row.description,
            expertise: parse_expertise(&row.expertise)?,
            technologies: row.technologies,
            image_url: row.image_url,
            live_url: row.live_url,
            github_url: row.github_url,
            featured: row.featured,
            completion_date: row.completion_date,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i32,
    title: String,
    slug: String,
    excerpt: String,
    content: String,
    author_username: String,
    category: Option<String>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    tags: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for BlogPost {
    type Error = RepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;
        let author = Username::parse(&row.author_username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let category = row
            .category
            .filter(|c| !c.is_empty())
            .map(|c| c.parse::<BlogCategory>())
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
            })?;

        Ok(Self {
            id: PostId::new(row.id),
            title: row.title,
            slug,
            excerpt: row.excerpt,
            content: row.content,
            author,
            category,
            published: row.published,
            published_at: row.published_at,
            tags: row.tags,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_PROJECTS: &str = r"
    SELECT id, title, client, description, expertise, technologies, image_url,
           live_url, github_url, featured, completion_date, created_at
    FROM site.portfolio_project
";

const SELECT_PUBLISHED_POSTS: &str = r"
    SELECT p.id, p.title, p.slug, p.excerpt, p.content, a.username AS author_username,
           p.category, p.published, p.published_at, p.tags, p.image_url,
           p.created_at, p.updated_at
    FROM site.blog_post p
    JOIN site.account a ON a.id = p.author_id
    WHERE p.published
";

/// Content repository backed by the content tables.
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn list_team(&self) -> Result<Vec<TeamMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r"
            SELECT id, name, position, bio, image_url, email, linkedin_url,
                   github_url, display_order
            FROM site.team_member
            ORDER BY display_order, name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn list_services(
        &self,
        expertise: Option<Expertise>,
    ) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r"
            SELECT id, title, description, expertise, icon, features, price_range,
                   display_order
            FROM site.service
            WHERE ($1::TEXT IS NULL OR expertise = $1)
            ORDER BY display_order, title
            ",
        )
        .bind(expertise.map(Expertise::key))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Service::try_from).collect()
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<PortfolioProject>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r"{SELECT_PROJECTS}
            WHERE ($1::TEXT IS NULL OR expertise = $1)
              AND (NOT $2 OR featured)
            ORDER BY completion_date DESC NULLS LAST, created_at DESC"
        ))
        .bind(filter.expertise.map(Expertise::key))
        .bind(filter.featured_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PortfolioProject::try_from).collect()
    }

    async fn find_project(
        &self,
        id: ProjectId,
    ) -> Result<Option<PortfolioProject>, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!("{SELECT_PROJECTS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PortfolioProject::try_from).transpose()
    }

    async fn list_published_posts(
        &self,
        category: Option<BlogCategory>,
    ) -> Result<Vec<BlogPost>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r"{SELECT_PUBLISHED_POSTS}
              AND ($1::TEXT IS NULL OR p.category = $1)
            ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC"
        ))
        .bind(category.map(BlogCategory::key))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BlogPost::try_from).collect()
    }

    async fn find_published_post(&self, slug: &Slug) -> Result<Option<BlogPost>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "{SELECT_PUBLISHED_POSTS} AND p.slug = $1"
        ))
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPost::try_from).transpose()
    }

    async fn create_team_member(
        &self,
        member: NewTeamMember,
    ) -> Result<TeamMember, RepositoryError> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r"
            INSERT INTO site.team_member
                (name, position, bio, image_url, email, linkedin_url, github_url, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, position, bio, image_url, email, linkedin_url,
                      github_url, display_order
            ",
        )
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.bio)
        .bind(member.image_url.as_deref())
        .bind(member.email.as_deref())
        .bind(member.linkedin_url.as_deref())
        .bind(member.github_url.as_deref())
        .bind(member.order)
        .fetch_one(&self.pool)
        .await?;

        Ok(TeamMember::from(row))
    }

    async fn create_service(&self, service: NewService) -> Result<Service, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r"
            INSERT INTO site.service
                (title, description, expertise, icon, features, price_range, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, expertise, icon, features, price_range,
                      display_order
            ",
        )
        .bind(&service.title)
        .bind(&service.description)
        .bind(service.expertise.key())
        .bind(&service.icon)
        .bind(&service.features)
        .bind(&service.price_range)
        .bind(service.order)
        .fetch_one(&self.pool)
        .await?;

        Service::try_from(row)
    }

    async fn create_project(
        &self,
        project: NewProject,
    ) -> Result<PortfolioProject, RepositoryError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r"
            INSERT INTO site.portfolio_project
                (title, client, description, expertise, technologies, image_url,
                 live_url, github_url, featured, completion_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, client, description, expertise, technologies, image_url,
                      live_url, github_url, featured, completion_date, created_at
            ",
        )
        .bind(&project.title)
        .bind(&project.client)
        .bind(&project.description)
        .bind(project.expertise.key())
        .bind(&project.technologies)
        .bind(project.image_url.as_deref())
        .bind(project.live_url.as_deref())
        .bind(project.github_url.as_deref())
        .bind(project.featured)
        .bind(project.completion_date)
        .fetch_one(&self.pool)
        .await?;

        PortfolioProject::try_from(row)
    }

    async fn create_post(&self, post: NewBlogPost) -> Result<BlogPost, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(
            r"
            WITH inserted AS (
                INSERT INTO site.blog_post
                    (title, slug, excerpt, content, author_id, category, published,
                     published_at, tags, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT inserted.id, inserted.title, inserted.slug, inserted.excerpt,
                   inserted.content, a.username AS author_username, inserted.category,
                   inserted.published, inserted.published_at, inserted.tags,
                   inserted.image_url, inserted.created_at, inserted.updated_at
            FROM inserted
            JOIN site.account a ON a.id = inserted.author_id
            ",
        )
        .bind(&post.title)
        .bind(post.slug.as_str())
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.author)
        .bind(post.category.map(BlogCategory::key))
        .bind(post.published)
        .bind(post.published_at)
        .bind(&post.tags)
        .bind(post.image_url.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique("slug"))?;

        BlogPost::try_from(row)
    }
}
