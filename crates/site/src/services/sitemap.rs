//! `sitemap.xml` entries.

use chrono::{DateTime, Utc};

use nexussphere_core::Expertise;

use crate::config::SiteConfig;
use crate::db::{ContentRepository, RepositoryError};
use crate::models::{BlogPost, PortfolioProject, ProjectFilter, Service};

/// Top-level pages listed in every sitemap.
const STATIC_PAGES: [&str; 6] = ["/", "/contact", "/services", "/portfolio", "/team", "/blog"];

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
    /// `YYYY-MM-DD`
    pub lastmod: Option<String>,
}

fn lastmod(at: DateTime<Utc>) -> Option<String> {
    Some(at.format("%Y-%m-%d").to_string())
}

/// Assemble the sitemap from already-loaded content.
///
/// Services are listed once per expertise that has any, pointing at the
/// filtered services page.
#[must_use]
pub fn build(
    config: &SiteConfig,
    services: &[Service],
    projects: &[PortfolioProject],
    posts: &[BlogPost],
) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = STATIC_PAGES
        .iter()
        .map(|path| SitemapEntry {
            loc: config.absolute_url(path),
            changefreq: "weekly",
            priority: "0.8",
            lastmod: None,
        })
        .collect();

    entries.extend(
        Expertise::ALL
            .into_iter()
            .filter(|e| services.iter().any(|s| s.expertise == *e))
            .map(|e| SitemapEntry {
                loc: config.absolute_url(&format!("/services?type={}", e.key())),
                changefreq: "monthly",
                priority: "0.6",
                lastmod: None,
            }),
    );

    entries.extend(projects.iter().map(|p| SitemapEntry {
        loc: config.absolute_url(&format!("/portfolio/{}", p.id)),
        changefreq: "weekly",
        priority: "0.7",
        lastmod: lastmod(p.created_at),
    }));

    entries.extend(posts.iter().map(|p| SitemapEntry {
        loc: config.absolute_url(&format!("/blog/{}", p.slug)),
        changefreq: "daily",
        priority: "0.8",
        lastmod: lastmod(p.created_at),
    }));

    entries
}

/// Load content and assemble the sitemap.
///
/// # Errors
///
/// Returns `RepositoryError` if content cannot be loaded.
pub async fn collect(
    content: &dyn ContentRepository,
    config: &SiteConfig,
) -> Result<Vec<SitemapEntry>, RepositoryError> {
    let services = content.list_services(None).await?;
    let projects = content.list_projects(ProjectFilter::default()).await?;
    let posts = content.list_published_posts(None).await?;
    Ok(build(config, &services, &projects, &posts))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nexussphere_core::ServiceId;
    use url::Url;

    use super::*;

    fn service(expertise: Expertise) -> Service {
        Service {
            id: ServiceId::new(1),
            title: "Service".to_string(),
            description: String::new(),
            expertise,
            icon: String::new(),
            features: Vec::new(),
            price_range: String::new(),
            order: 0,
        }
    }

    #[test]
    fn test_static_pages_and_service_types() {
        let config = SiteConfig::local(Url::parse("https://example.org").unwrap());
        let services = [
            service(Expertise::Crm),
            service(Expertise::Crm),
            service(Expertise::WebApps),
        ];
        let entries = build(&config, &services, &[], &[]);

        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].loc, "https://example.org/");
        assert_eq!(entries[0].priority, "0.8");
        assert_eq!(entries[6].loc, "https://example.org/services?type=web_apps");
        assert_eq!(entries[7].loc, "https://example.org/services?type=crm");
        assert_eq!(entries[7].changefreq, "monthly");
    }
}
