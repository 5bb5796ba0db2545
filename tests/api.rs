//! REST API behavior through the full router

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use movie_rental_server::{
    api,
    config::{AppConfig, SeedConfig},
    AppState,
};

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let services = common::services().await;
        services
            .seed(&SeedConfig {
                admin_handle: "admin".into(),
                admin_password: Some("admin-pass".into()),
                demo_titles: false,
            })
            .await
            .expect("seed");

        Self {
            router: api::router(AppState::new(AppConfig::default(), services)),
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "username": username, "password": "secret" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["token_type"], "Bearer");
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_title(&self, admin: &str, name: &str, genre: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/titles",
                Some(admin),
                Some(json!({ "name": name, "genre": genre })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = app.send(Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rentals_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/v1/rentals", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = app
        .send(Method::GET, "/api/v1/rentals", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rent_and_return_flow() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin-pass").await;
    let user = app.register("alice").await;
    let title_id = app.create_title(&admin, "Inception", "Sci-Fi").await;

    let rent_uri = format!("/api/v1/titles/{}/rent", title_id);
    let (status, body) = app.send(Method::POST, &rent_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let rental_id = body["rental"]["id"].as_i64().unwrap();
    assert!(body["rental"]["return_date"].is_null());

    let (status, body) = app.send(Method::POST, &rent_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyRented");

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/titles/{}", title_id), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_copies"], 4);

    let (status, body) = app.send(Method::GET, "/api/v1/rentals", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let rentals = body.as_array().unwrap();
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0]["title"]["name"], "Inception");
    assert_eq!(rentals[0]["late_days"], 0);
    assert_eq!(rentals[0]["is_overdue"], false);

    let return_uri = format!("/api/v1/rentals/{}/return", rental_id);
    let (status, body) = app.send(Method::POST, &return_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(!body["rental"]["return_date"].is_null());

    let (status, body) = app.send(Method::POST, &return_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyReturned");

    let (_, body) = app
        .send(Method::GET, &format!("/api/v1/titles/{}", title_id), Some(&user), None)
        .await;
    assert_eq!(body["available_copies"], 5);
}

#[tokio::test]
async fn test_other_renters_rentals_are_hidden() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin-pass").await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let title_id = app.create_title(&admin, "Heat", "Crime").await;

    let (_, body) = app
        .send(Method::POST, &format!("/api/v1/titles/{}/rent", title_id), Some(&alice), None)
        .await;
    let rental_id = body["rental"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::GET, &format!("/api/v1/rentals/{}", rental_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::POST, &format!("/api/v1/rentals/{}/return", rental_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_changes_need_admin() {
    let app = TestApp::new().await;
    let user = app.register("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/titles",
            Some(&user),
            Some(json!({ "name": "Heat", "genre": "Crime" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = app.send(Method::GET, "/api/v1/inventory", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_catalog_management() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "admin-pass").await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/titles", Some(&admin), Some(json!({ "name": "Heat" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let title_id = app.create_title(&admin, "Heat", "Crime").await;
    let title_uri = format!("/api/v1/titles/{}", title_id);

    let (status, body) = app
        .send(
            Method::PUT,
            &title_uri,
            Some(&admin),
            Some(json!({ "name": "Heat", "genre": "Crime", "available_copies": "3" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["available_copies"], 3);
    assert_eq!(body["max_copies"], 3);

    let (status, _) = app
        .send(
            Method::PUT,
            &title_uri,
            Some(&admin),
            Some(json!({ "name": "Heat", "genre": "Crime", "available_copies": "lots" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/titles/9999",
            Some(&admin),
            Some(json!({ "name": "Ghost", "genre": "Drama" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::GET, "/api/v1/inventory", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["open_rentals"], 0);

    let (status, body) = app.send(Method::DELETE, &title_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.send(Method::DELETE, &title_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::GET, "/api/v1/titles", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_conflict_and_bad_login() {
    let app = TestApp::new().await;
    app.register("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.login("alice", "secret").await;
    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["handle"], "alice");
    assert_eq!(body["role"], "user");
}
