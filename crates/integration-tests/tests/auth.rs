//! Signup, login and logout flows.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use nexussphere_integration_tests::{PASSWORD, TestApp};

#[tokio::test]
async fn test_signup_then_login() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client
        .post_form(
            "/auth/signup",
            &[
                ("username", "carol"),
                ("email", "carol@example.com"),
                ("password1", "long-enough-1"),
                ("password2", "long-enough-1"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login?registered=1"));

    let account = app.account("carol").await.unwrap();
    assert!(!account.is_staff);
    assert_eq!(account.email.unwrap().as_str(), "carol@example.com");

    let login = client
        .post_form(
            "/auth/login",
            &[("username", "carol"), ("password", "long-enough-1")],
        )
        .await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    assert_eq!(login.location(), Some("/items"));
    assert!(client.has_session());

    let page = client.get("/items").await.text();
    assert!(page.contains("Signed in as carol"));
}

#[tokio::test]
async fn test_signup_errors_rerender_form() {
    let app = TestApp::new();
    app.create_user("taken", false).await;
    let mut client = app.client();

    let mismatch = client
        .post_form(
            "/auth/signup",
            &[
                ("username", "dave"),
                ("password1", "long-enough-1"),
                ("password2", "long-enough-2"),
            ],
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::OK);
    assert!(mismatch.text().contains("The two password fields didn"));

    let short = client
        .post_form(
            "/auth/signup",
            &[
                ("username", "dave"),
                ("password1", "short"),
                ("password2", "short"),
            ],
        )
        .await;
    assert_eq!(short.status, StatusCode::OK);
    assert!(short.text().contains("at least 8 characters"));

    let duplicate = client
        .post_form(
            "/auth/signup",
            &[
                ("username", "taken"),
                ("password1", "long-enough-1"),
                ("password2", "long-enough-1"),
            ],
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::OK);
    assert!(duplicate.text().contains("A user with that username already exists."));

    assert!(app.account("dave").await.is_none());
}

#[tokio::test]
async fn test_login_honours_local_next_only() {
    let app = TestApp::new();
    app.create_user("alice", false).await;

    let mut client = app.client();
    let response = client
        .post_form(
            "/auth/login",
            &[
                ("username", "alice"),
                ("password", PASSWORD),
                ("next", "/items/create"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/items/create"));

    let mut client = app.client();
    let response = client
        .post_form(
            "/auth/login",
            &[
                ("username", "alice"),
                ("password", PASSWORD),
                ("next", "https://evil.example/"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/items"));
}

#[tokio::test]
async fn test_bad_credentials_redirect_with_error() {
    let app = TestApp::new();
    app.create_user("alice", false).await;

    let mut client = app.client();
    let response = client
        .post_form(
            "/auth/login",
            &[
                ("username", "alice"),
                ("password", "wrong-password"),
                ("next", "/items/create"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some("/auth/login?error=credentials&next=%2Fitems%2Fcreate")
    );
    assert!(!client.has_session());

    let page = client
        .get(response.location().unwrap())
        .await
        .text();
    assert!(page.contains("Please enter a correct username and password."));
    assert!(page.contains(r#"value="/items/create""#));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    app.create_user("alice", false).await;

    let mut client = app.client();
    client.login("alice").await;
    assert_eq!(client.get("/items/create").await.status, StatusCode::OK);

    let response = client.post_form("/auth/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    assert_eq!(
        client.get("/items/create").await.status,
        StatusCode::SEE_OTHER
    );
}
