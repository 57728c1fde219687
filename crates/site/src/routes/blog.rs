//! Blog route handlers.

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

use nexussphere_core::{BlogCategory, Slug};

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{BlogPost, Page};
use crate::routes::{FilterLink, PageContext, PaginationView};
use crate::state::AppState;

/// Posts per listing page.
pub const POSTS_PER_PAGE: usize = 10;

/// Post view for templates.
#[derive(Debug, Clone)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub category_label: Option<&'static str>,
    /// e.g. "March 4, 2025"
    pub published_on: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

impl From<&BlogPost> for PostView {
    fn from(post: &BlogPost) -> Self {
        Self {
            slug: post.slug.to_string(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.to_string(),
            category_label: post.category.map(BlogCategory::label),
            published_on: post
                .published_at
                .map(|at| at.format("%B %-d, %Y").to_string()),
            image_url: post.image_url.clone(),
            tags: post.tag_list().into_iter().map(String::from).collect(),
        }
    }
}

/// Query parameters for the blog listing.
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub page: Option<String>,
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/list.html")]
pub struct BlogListTemplate {
    pub page: PageContext,
    pub posts: Vec<PostView>,
    pub filters: Vec<FilterLink>,
    pub active_filter: Option<BlogCategory>,
    pub pagination: PaginationView,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/detail.html")]
pub struct BlogDetailTemplate {
    pub page: PageContext,
    pub post: PostView,
    /// Staff-authored HTML, rendered unescaped.
    pub content: String,
}

/// Display one page of published posts.
///
/// # Errors
///
/// Returns 404 for a page past the end or a non-numeric page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<BlogQuery>,
) -> Result<impl IntoResponse> {
    let active_filter: Option<BlogCategory> =
        query.category.as_deref().and_then(|c| c.parse().ok());
    let posts = state.content().list_published_posts(active_filter).await?;

    let listing = Page::paginate(posts, query.page.as_deref(), POSTS_PER_PAGE)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    let pagination = PaginationView::new(
        &listing,
        "/blog",
        active_filter.map(|c| ("category", c.key())),
    );

    let filters = BlogCategory::ALL
        .into_iter()
        .map(|c| FilterLink {
            key: c.key(),
            label: c.label(),
            active: active_filter == Some(c),
        })
        .collect();

    Ok(BlogListTemplate {
        page: PageContext::new(&state, user.as_ref()),
        posts: listing.items.iter().map(PostView::from).collect(),
        filters,
        active_filter,
        pagination,
    })
}

/// Display a single published post by slug.
///
/// # Errors
///
/// Returns 404 if the post doesn't exist or is unpublished.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound(format!("post {slug}"));
    let parsed = Slug::parse(&slug).map_err(|_| not_found())?;
    let post = state
        .content()
        .find_published_post(&parsed)
        .await?
        .ok_or_else(not_found)?;

    Ok(BlogDetailTemplate {
        page: PageContext::new(&state, user.as_ref()),
        post: PostView::from(&post),
        content: post.content,
    })
}

/// Create the blog routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{slug}", get(show))
}
