//! Integration tests for NexusSphere.
//!
//! The full router is driven in-process with `tower::ServiceExt::oneshot`
//! over the in-memory repositories and the in-memory session store, so no
//! database or running server is needed.
//!
//! ```bash
//! cargo test -p nexussphere-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `items_html` - item pages, login redirects and ownership checks
//! - `items_api` - JSON API status codes and representations
//! - `auth` - signup, login and logout
//! - `pages` - company pages, contact form, brochure, sitemap and robots

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        HeaderMap, HeaderValue, Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;
use url::Url;

use nexussphere_core::Username;
use nexussphere_site::config::SiteConfig;
use nexussphere_site::db::memory::MemoryStore;
use nexussphere_site::db::{ItemRepository, UserRepository};
use nexussphere_site::middleware::session::SESSION_COOKIE_NAME;
use nexussphere_site::models::{Account, Item, ItemChanges, NewItem};
use nexussphere_site::routes;
use nexussphere_site::services::auth::{AuthService, Registration};
use nexussphere_site::state::AppState;

/// Base URL the test site believes it is served from.
pub const BASE_URL: &str = "https://nexusspheresolutions.com";

/// Password given to every account made by [`TestApp::create_user`].
pub const PASSWORD: &str = "correct-horse-42";

/// A site instance over fresh in-memory storage.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: NormalizePath<Router>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let base_url = Url::parse(BASE_URL).expect("valid base url");
        let state = AppState::in_memory(SiteConfig::local(base_url), &store);
        let router = routes::app(state, tower_sessions::MemoryStore::default());
        Self { store, router }
    }

    /// Send one request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body: bytes.to_vec(),
        }
    }

    /// A client without a session.
    #[must_use]
    pub const fn client(&self) -> Client<'_> {
        Client {
            app: self,
            cookie: None,
            basic: None,
        }
    }

    /// Create an account with [`PASSWORD`].
    pub async fn create_user(&self, username: &str, is_staff: bool) -> Account {
        AuthService::new(&*self.store)
            .register(Registration {
                username,
                email: None,
                password: PASSWORD,
                is_staff,
            })
            .await
            .expect("account created")
    }

    /// Insert an item directly, bypassing HTTP.
    pub async fn create_item(&self, owner: &Account, name: &str) -> Item {
        ItemRepository::create(
            &*self.store,
            NewItem {
                fields: ItemChanges::parse(Some(name), Some("seeded")).expect("valid item"),
                owner: owner.id,
            },
        )
        .await
        .expect("item created")
    }

    /// Current stored state of an item.
    pub async fn item(&self, item: &Item) -> Option<Item> {
        ItemRepository::find_by_id(&*self.store, item.id)
            .await
            .expect("lookup")
    }

    pub async fn item_count(&self) -> usize {
        ItemRepository::list_all(&*self.store, nexussphere_site::db::ItemOrder::Oldest)
            .await
            .expect("list")
            .len()
    }

    pub async fn account(&self, username: &str) -> Option<Account> {
        let username = Username::parse(username).expect("valid username");
        UserRepository::find_by_username(&*self.store, &username)
            .await
            .expect("lookup")
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The session cookie this response sets, as `name=value`. An empty
    /// string means the cookie was removed.
    fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                (name.trim() == SESSION_COOKIE_NAME).then(|| {
                    if value.is_empty() {
                        String::new()
                    } else {
                        pair.trim().to_string()
                    }
                })
            })
    }
}

/// A browser-like client that carries the session cookie between requests.
pub struct Client<'a> {
    app: &'a TestApp,
    cookie: Option<String>,
    basic: Option<String>,
}

impl Client<'_> {
    /// Send HTTP Basic credentials on every request.
    #[must_use]
    pub fn with_basic(mut self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.basic = Some(format!("Basic {encoded}"));
        self
    }

    pub async fn send(
        &mut self,
        method: Method,
        path: &str,
        content_type: Option<&'static str>,
        body: Body,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(basic) = &self.basic {
            request = request.header(
                AUTHORIZATION,
                HeaderValue::from_str(basic).expect("header value"),
            );
        }

        let response = self
            .app
            .send(request.body(body).expect("valid request"))
            .await;
        match response.session_cookie() {
            Some(cookie) if cookie.is_empty() => self.cookie = None,
            Some(cookie) => self.cookie = Some(cookie),
            None => {}
        }
        response
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None, Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Method::POST,
            path,
            Some("application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    pub async fn json(
        &mut self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> TestResponse {
        self.send(
            method,
            path,
            Some("application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    /// Log in through the form. Panics unless the login succeeds.
    pub async fn login(&mut self, username: &str) {
        let response = self
            .post_form(
                "/auth/login",
                &[("username", username), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed");
        assert!(self.cookie.is_some(), "login did not set a session cookie");
    }

    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }
}
