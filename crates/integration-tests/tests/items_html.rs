//! Item pages: browsing, login redirects and ownership checks.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use nexussphere_integration_tests::{PASSWORD, TestApp};
use nexussphere_site::db::{ItemOrder, ItemRepository};

#[tokio::test]
async fn test_anonymous_list_shows_item_names() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_item(&alice, "Alpha widget").await;
    app.create_item(&alice, "Beta widget").await;

    let response = app.client().get("/items").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Alpha widget"));
    assert!(body.contains("Beta widget"));
    assert!(body.find("Alpha widget") < body.find("Beta widget"));
}

#[tokio::test]
async fn test_trailing_slash_reaches_same_page() {
    let app = TestApp::new();
    let response = app.client().get("/items/").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_form_redirects_anonymous_to_login() {
    let app = TestApp::new();
    let response = app.client().get("/items/create").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login?next=/items/create"));
}

#[tokio::test]
async fn test_login_returns_to_requested_item_page() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    let item = app.create_item(&alice, "Gamma widget").await;
    let mut client = app.client();

    let edit_path = format!("/items/{}/edit", item.id);
    let redirect = client.get(&edit_path).await;
    assert_eq!(
        redirect.location(),
        Some(format!("/auth/login?next={edit_path}").as_str())
    );

    let login = client
        .post_form(
            "/auth/login",
            &[("username", "alice"), ("password", PASSWORD), ("next", &edit_path)],
        )
        .await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    assert_eq!(login.location(), Some(edit_path.as_str()));

    let form = client.get(&edit_path).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.text().contains("Gamma widget"));
}

#[tokio::test]
async fn test_create_assigns_owner_and_ignores_submitted_owner() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    let bob = app.create_user("bob", false).await;

    let mut client = app.client();
    client.login("alice").await;
    let owner_field = bob.id.to_string();
    let response = client
        .post_form(
            "/items/create",
            &[
                ("name", "Gadget"),
                ("description", "Shiny"),
                ("owner", &owner_field),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/items"));

    let items = client.get("/items").await.text();
    assert!(items.contains("Gadget"));

    let created = ItemRepository::list_all(&*app.store, ItemOrder::Oldest)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].owner.as_ref().map(|o| o.id), Some(alice.id));
}

#[tokio::test]
async fn test_create_with_blank_name_rerenders_form() {
    let app = TestApp::new();
    app.create_user("alice", false).await;

    let mut client = app.client();
    client.login("alice").await;
    let response = client
        .post_form("/items/create", &[("name", "   "), ("description", "kept")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.text();
    assert!(body.contains("This field is required."));
    assert!(body.contains("kept"));
    assert_eq!(app.item_count().await, 0);
}

#[tokio::test]
async fn test_owner_edit_keeps_owner() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    let bob = app.create_user("bob", false).await;
    let item = app.create_item(&alice, "Original").await;

    let mut client = app.client();
    client.login("alice").await;
    let owner_field = bob.id.to_string();
    let response = client
        .post_form(
            &format!("/items/{}/edit", item.id),
            &[
                ("name", "Renamed"),
                ("description", "Updated"),
                ("owner", &owner_field),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/items"));

    let stored = app.item(&item).await.unwrap();
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.description, "Updated");
    assert_eq!(stored.owner_username(), Some("alice"));
    assert_eq!(stored.created_at, item.created_at);
}

#[tokio::test]
async fn test_non_owner_edit_is_forbidden_and_row_unchanged() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_user("mallory", false).await;
    let item = app.create_item(&alice, "Original").await;

    let mut client = app.client();
    client.login("mallory").await;

    let form = client.get(&format!("/items/{}/edit", item.id)).await;
    assert_eq!(form.status, StatusCode::FORBIDDEN);

    let response = client
        .post_form(
            &format!("/items/{}/edit", item.id),
            &[("name", "Hijacked"), ("description", "")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.item(&item).await.unwrap(), item);
}

#[tokio::test]
async fn test_staff_may_edit_any_item() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_user("root", true).await;
    let item = app.create_item(&alice, "Original").await;

    let mut client = app.client();
    client.login("root").await;
    let response = client
        .post_form(
            &format!("/items/{}/edit", item.id),
            &[("name", "Moderated"), ("description", "")],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let stored = app.item(&item).await.unwrap();
    assert_eq!(stored.name, "Moderated");
    assert_eq!(stored.owner_username(), Some("alice"));
}

#[tokio::test]
async fn test_invalid_edit_leaves_row_untouched() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    let item = app.create_item(&alice, "Original").await;

    let mut client = app.client();
    client.login("alice").await;
    let response = client
        .post_form(
            &format!("/items/{}/edit", item.id),
            &[("name", ""), ("description", "new")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("This field is required."));
    assert_eq!(app.item(&item).await.unwrap(), item);
}

#[tokio::test]
async fn test_check_order_is_login_then_lookup_then_owner() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_user("mallory", false).await;
    let item = app.create_item(&alice, "Original").await;

    // Anonymous: redirected even for an id that doesn't exist.
    let response = app.client().get("/items/999/edit").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login?next=/items/999/edit"));

    let mut client = app.client();
    client.login("mallory").await;
    assert_eq!(
        client.get("/items/999/edit").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get("/items/not-a-number/edit").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get(&format!("/items/{}/delete", item.id)).await.status,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_owner_delete_then_detail_is_404() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    let item = app.create_item(&alice, "Doomed").await;

    let mut client = app.client();
    client.login("alice").await;

    let confirm = client.get(&format!("/items/{}/delete", item.id)).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.text().contains("Doomed"));

    let response = client
        .post_form(&format!("/items/{}/delete", item.id), &[])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/items"));

    let detail = client.get(&format!("/items/{}", item.id)).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_delete_is_forbidden_and_row_remains() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_user("mallory", false).await;
    let item = app.create_item(&alice, "Keeper").await;

    let mut client = app.client();
    client.login("mallory").await;
    let response = client
        .post_form(&format!("/items/{}/delete", item.id), &[])
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.item(&item).await.is_some());
}

#[tokio::test]
async fn test_detail_shows_edit_links_only_to_owner() {
    let app = TestApp::new();
    let alice = app.create_user("alice", false).await;
    app.create_user("bob", false).await;
    let item = app.create_item(&alice, "Mine").await;
    let edit_link = format!("/items/{}/edit", item.id);

    let anonymous = app.client().get(&format!("/items/{}", item.id)).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(!anonymous.text().contains(&edit_link));

    let mut bob = app.client();
    bob.login("bob").await;
    assert!(!bob.get(&format!("/items/{}", item.id)).await.text().contains(&edit_link));

    let mut owner = app.client();
    owner.login("alice").await;
    assert!(owner.get(&format!("/items/{}", item.id)).await.text().contains(&edit_link));
}
