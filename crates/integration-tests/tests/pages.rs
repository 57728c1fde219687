//! Company pages, contact form, brochure, sitemap and robots.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use nexussphere_core::{BlogCategory, Expertise, Slug};
use nexussphere_integration_tests::TestApp;
use nexussphere_site::db::{ContactRepository, ContentRepository};
use nexussphere_site::models::{NewBlogPost, NewProject, NewService, NewTeamMember};


fn service(title: &str, expertise: Expertise) -> NewService {
    NewService {
        title: title.to_string(),
        description: format!("{title} description"),
        expertise,
        icon: "fas fa-code".to_string(),
        features: vec!["Fast delivery".to_string()],
        price_range: "$5k+".to_string(),
        order: 0,
    }
}

fn project(title: &str, expertise: Expertise, featured: bool) -> NewProject {
    NewProject {
        title: title.to_string(),
        client: "Acme".to_string(),
        description: format!("{title} description"),
        expertise,
        technologies: "Rust, PostgreSQL".to_string(),
        image_url: None,
        live_url: None,
        github_url: None,
        featured,
        completion_date: None,
    }
}

async fn seed_post(app: &TestApp, title: &str, published: bool) {
    let author = match app.account("editor").await {
        Some(account) => account,
        None => app.create_user("editor", true).await,
    };
    ContentRepository::create_post(
        &*app.store,
        NewBlogPost {
            title: title.to_string(),
            slug: Slug::from_title(title).unwrap(),
            excerpt: format!("{title} excerpt"),
            content: format!("<p><strong>{title}</strong> body</p>"),
            author: author.id,
            category: Some(BlogCategory::Tech),
            published,
            published_at: None,
            tags: "rust, web".to_string(),
            image_url: None,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let mut client = app.client();

    let live = client.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");

    assert_eq!(client.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_static_pages_render_site_name() {
    let app = TestApp::new();
    let mut client = app.client();

    for path in ["/", "/about", "/privacy", "/terms", "/team", "/contact"] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(response.text().contains("NexusSphere"), "{path}");
    }
    assert!(
        client
            .get("/privacy")
            .await
            .text()
            .contains("info@nexusspheresolutions.com")
    );
}

#[tokio::test]
async fn test_every_response_carries_security_headers_and_request_id() {
    let app = TestApp::new();
    let response = app.client().get("/about").await;

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    assert!(response.header("content-security-policy").is_some());
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_home_lists_services_and_featured_projects() {
    let app = TestApp::new();
    ContentRepository::create_service(&*app.store, service("Custom Web Apps", Expertise::WebApps))
        .await
        .unwrap();
    ContentRepository::create_project(
        &*app.store,
        project("Featured Portal", Expertise::Geoscience, true),
    )
    .await
    .unwrap();
    ContentRepository::create_project(
        &*app.store,
        project("Quiet Project", Expertise::Crm, false),
    )
    .await
    .unwrap();

    let body = app.client().get("/").await.text();
    assert!(body.contains("Custom Web Apps"));
    assert!(body.contains("Featured Portal"));
    assert!(!body.contains("Quiet Project"));
}

#[tokio::test]
async fn test_team_page_lists_members() {
    let app = TestApp::new();
    ContentRepository::create_team_member(
        &*app.store,
        NewTeamMember {
            name: "Ada Lovelace".to_string(),
            position: "CTO".to_string(),
            bio: "Writes the first programs.".to_string(),
            image_url: None,
            email: None,
            linkedin_url: Some("https://linkedin.example/ada".to_string()),
            github_url: None,
            order: 1,
        },
    )
    .await
    .unwrap();

    let body = app.client().get("/team").await.text();
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("https://linkedin.example/ada"));
}

#[tokio::test]
async fn test_services_filter_and_unknown_type() {
    let app = TestApp::new();
    ContentRepository::create_service(&*app.store, service("Custom Web Apps", Expertise::WebApps))
        .await
        .unwrap();
    ContentRepository::create_service(&*app.store, service("Sales CRM", Expertise::Crm))
        .await
        .unwrap();
    let mut client = app.client();

    let filtered = client.get("/services?type=crm").await.text();
    assert!(filtered.contains("Sales CRM"));
    assert!(!filtered.contains("Custom Web Apps"));

    let unknown = client.get("/services?type=robotics").await;
    assert_eq!(unknown.status, StatusCode::OK);
    let unknown = unknown.text();
    assert!(unknown.contains("Sales CRM"));
    assert!(unknown.contains("Custom Web Apps"));
}

#[tokio::test]
async fn test_portfolio_pagination() {
    let app = TestApp::new();
    for n in 0..13 {
        ContentRepository::create_project(
            &*app.store,
            project(&format!("Project {n:02}"), Expertise::WebApps, false),
        )
        .await
        .unwrap();
    }
    let mut client = app.client();

    let first = client.get("/portfolio").await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.text().contains("Page 1 of 2"));

    let second = client.get("/portfolio?page=2").await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.text().contains("Page 2 of 2"));

    assert_eq!(
        client.get("/portfolio?page=3").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get("/portfolio?page=abc").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_empty_listing_has_page_one() {
    let app = TestApp::new();
    let mut client = app.client();
    assert_eq!(client.get("/portfolio").await.status, StatusCode::OK);
    assert_eq!(client.get("/blog?page=1").await.status, StatusCode::OK);
    assert_eq!(client.get("/blog?page=2").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_portfolio_detail() {
    let app = TestApp::new();
    let created = ContentRepository::create_project(
        &*app.store,
        project("Field Data Portal", Expertise::Geoscience, true),
    )
    .await
    .unwrap();
    let mut client = app.client();

    let detail = client.get(&format!("/portfolio/{}", created.id)).await;
    assert_eq!(detail.status, StatusCode::OK);
    let body = detail.text();
    assert!(body.contains("Field Data Portal"));
    assert!(body.contains("PostgreSQL"));

    assert_eq!(client.get("/portfolio/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/portfolio/nope").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_shows_published_posts_only() {
    let app = TestApp::new();
    seed_post(&app, "Launch Day", true).await;
    seed_post(&app, "Secret Draft", false).await;
    let mut client = app.client();

    let list = client.get("/blog").await.text();
    assert!(list.contains("Launch Day"));
    assert!(!list.contains("Secret Draft"));

    let detail = client.get("/blog/launch-day").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.text().contains("<strong>Launch Day</strong>"));

    assert_eq!(client.get("/blog/secret-draft").await.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/blog/missing").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_success_stores_submission() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client
        .post_form(
            "/contact",
            &[
                ("name", "Grace"),
                ("email", "grace@example.com"),
                ("company", "Navy"),
                ("message", "We need a CRM."),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/contact?sent=1"));

    let stored = ContactRepository::list_recent(&*app.store, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].company.as_deref(), Some("Navy"));

    let page = client.get("/contact?sent=1").await.text();
    assert!(page.contains("Your message has been sent"));
}

#[tokio::test]
async fn test_contact_missing_message_stores_nothing() {
    let app = TestApp::new();
    let response = app
        .client()
        .post_form(
            "/contact",
            &[("name", "Grace"), ("email", "grace@example.com"), ("message", "")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Please fill in all required fields."));
    assert!(body.contains("grace@example.com"));
    assert!(
        ContactRepository::list_recent(&*app.store, 10)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_brochure_download() {
    let app = TestApp::new();
    let response = app.client().get("/brochure").await;

    assert_eq!(response.status, StatusCode::OK);
    let disposition = response.header("content-disposition").unwrap();
    assert!(disposition.starts_with("attachment; filename=\"nexussphere_brochure."));
    assert!(!response.body.is_empty());
}

#[tokio::test]
async fn test_sitemap_lists_pages_and_content() {
    let app = TestApp::new();
    ContentRepository::create_service(&*app.store, service("Sales CRM", Expertise::Crm))
        .await
        .unwrap();
    let created = ContentRepository::create_project(
        &*app.store,
        project("Portal", Expertise::WebApps, false),
    )
    .await
    .unwrap();
    seed_post(&app, "Launch Day", true).await;
    seed_post(&app, "Secret Draft", false).await;

    let response = app.client().get("/sitemap.xml").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("content-type").unwrap().starts_with("application/xml"));

    let body = response.text();
    assert!(body.contains("<urlset"));
    assert!(body.contains("<loc>https://nexusspheresolutions.com/</loc>"));
    assert!(body.contains("<loc>https://nexusspheresolutions.com/team</loc>"));
    assert!(body.contains("/services?type=crm</loc>"));
    assert!(!body.contains("/services?type=web_apps</loc>"));
    assert!(body.contains(&format!("/portfolio/{}</loc>", created.id)));
    assert!(body.contains("/blog/launch-day</loc>"));
    assert!(!body.contains("secret-draft"));
}

#[tokio::test]
async fn test_robots_points_at_sitemap() {
    let app = TestApp::new();
    let response = app.client().get("/robots.txt").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.starts_with("User-agent: *"));
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains("Sitemap: https://nexusspheresolutions.com/sitemap.xml"));
}
