//! End-to-end tests driving the full router against an in-memory database.

use crate::auth::cookie::SessionCookie;
use crate::auth::middleware::session_auth;
use crate::auth::service::AuthService;
use crate::database::test_database;
use crate::repositories::user_repository::{UserRepository, UserStore};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, Response, StatusCode,
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    middleware,
    routing::get,
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tower::ServiceExt;

const SECRET: &str = "e2e-secret";
const TWELVE_HOURS: u64 = 12 * 60 * 60;

struct TestApp {
    router: Router,
    repo: UserRepository,
}

async fn test_app() -> TestApp {
    let db = test_database().await;
    let repo = UserRepository::new(db.pool().clone());
    let auth_service = Arc::new(AuthService::new(
        UserService::new(Arc::new(repo.clone()), PasswordHasher::new(4)),
        Arc::new(JwtUtils::new(SECRET, TWELVE_HOURS)),
        SessionCookie::default(),
    ));

    TestApp {
        router: crate::app(auth_service),
        repo,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn with_cookie(&self, method: &str, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(COOKIE, format!("token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Response<Body> {
        self.post_json(
            "/signup",
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Response<Body> {
        self.post_json("/login", json!({ "email": email, "password": password }))
            .await
    }

    /// Registers and logs in, returning the session token from the cookie.
    async fn logged_in(&self, email: &str) -> String {
        self.signup("A", email, "secret").await;
        let response = self.login(email, "secret").await;
        assert_eq!(response.status(), StatusCode::OK);
        cookie_value(&set_cookie(&response).unwrap()).to_string()
    }
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string())
}

fn cookie_value(set_cookie: &str) -> &str {
    let pair = set_cookie.split(';').next().unwrap();
    pair.strip_prefix("token=").expect("token cookie")
}

fn cookie_expires(set_cookie: &str) -> DateTime<Utc> {
    let raw = set_cookie
        .split(';')
        .find_map(|attr| attr.trim().strip_prefix("Expires="))
        .expect("Expires attribute");
    NaiveDateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S GMT")
        .unwrap()
        .and_utc()
}

#[tokio::test]
async fn test_root_banner() {
    let app = test_app().await;
    let response = app
        .send(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
}

#[tokio::test]
async fn test_signup_creates_user_without_password() {
    let app = test_app().await;
    let response = app.signup("A", "a@x.com", "secret").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "A");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let stored = app.repo.get_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret");
}

#[tokio::test]
async fn test_signup_rejects_unparseable_body() {
    let app = test_app().await;
    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/signup")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["error_type"], "invalid_body");
}

#[tokio::test]
async fn test_signup_rejects_missing_field() {
    let app = test_app().await;
    let response = app
        .post_json("/signup", json!({ "name": "A", "email": "a@x.com" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_validates_fields() {
    let app = test_app().await;
    let response = app.signup("", "not-an-email", "secret").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["error_type"], "validation_error");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = test_app().await;
    assert_eq!(
        app.signup("A", "a@x.com", "secret").await.status(),
        StatusCode::CREATED
    );

    let response = app.signup("B", "A@x.com", "other").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["error_type"], "already_exists");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = test_app().await;
    app.signup("A", "a@x.com", "secret").await;

    let response = app.login("a@x.com", "secret").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("session cookie");
    assert!(!cookie_value(&cookie).is_empty());
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));

    let remaining = cookie_expires(&cookie) - Utc::now();
    assert!(remaining > Duration::hours(12) - Duration::minutes(1));
    assert!(remaining <= Duration::hours(12));

    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app().await;
    app.signup("A", "a@x.com", "secret").await;

    let response = app.login("a@x.com", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["error_type"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = test_app().await;
    app.signup("A", "a@x.com", "secret").await;

    let wrong_password = app.login("a@x.com", "wrong").await;
    let unknown_email = app.login("nobody@x.com", "secret").await;

    assert_eq!(wrong_password.status(), unknown_email.status());
    assert!(set_cookie(&unknown_email).is_none());
    assert_eq!(
        body_json(wrong_password).await["message"],
        body_json(unknown_email).await["message"]
    );
}

#[tokio::test]
async fn test_check_session_without_cookie() {
    let app = test_app().await;
    let response = app
        .send(
            Request::builder()
                .uri("/checksession")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "isSessionValid": false }));
}

#[tokio::test]
async fn test_check_session_with_login_cookie() {
    let app = test_app().await;
    let token = app.logged_in("a@x.com").await;

    let response = app.with_cookie("GET", "/checksession", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "isSessionValid": true }));
}

#[tokio::test]
async fn test_check_session_with_expired_token() {
    let app = test_app().await;
    let issued = JwtUtils::new(SECRET, 0).generate_token("user-1").unwrap();

    let response = app.with_cookie("GET", "/checksession", &issued.token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "isSessionValid": false }));
}

#[tokio::test]
async fn test_check_session_with_foreign_token() {
    let app = test_app().await;
    let issued = JwtUtils::new("some-other-secret", TWELVE_HOURS)
        .generate_token("user-1")
        .unwrap();

    let response = app.with_cookie("GET", "/checksession", &issued.token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["error_type"], "invalid_signature");
    assert_eq!(body["success"], false);
    assert!(body.get("isSessionValid").is_none());
}

#[tokio::test]
async fn test_check_session_with_garbage_token() {
    let app = test_app().await;

    let response = app.with_cookie("GET", "/checksession", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["error_type"], "malformed_token");
    assert_eq!(body["success"], false);
    assert!(body.get("isSessionValid").is_none());
}

#[tokio::test]
async fn test_gate_short_circuits_before_handler() {
    let reached = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reached);
    let jwt_utils = Arc::new(JwtUtils::new(SECRET, TWELVE_HOURS));

    let router = Router::new()
        .route(
            "/protected",
            get(move || {
                let flag = Arc::clone(&flag);
                async move {
                    flag.store(true, Ordering::SeqCst);
                    "reached"
                }
            }),
        )
        .layer(middleware::from_fn_with_state(jwt_utils, session_auth));

    for cookie in [None, Some("token=garbage")] {
        let mut request = Request::builder().uri("/protected");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        let response = router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::OK);
    }

    assert!(!reached.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = test_app().await;
    let token = app.logged_in("a@x.com").await;

    let response = app.with_cookie("POST", "/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response).expect("clearing cookie");
    assert_eq!(cookie_value(&cookie), "");
    assert!(cookie_expires(&cookie) < Utc::now());
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_logout_requires_session() {
    let app = test_app().await;
    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn test_token_outlives_logout() {
    // Sessions are stateless: logout only removes the client's copy.
    let app = test_app().await;
    let token = app.logged_in("a@x.com").await;

    app.with_cookie("POST", "/logout", &token).await;
    let response = app.with_cookie("GET", "/checksession", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = test_app().await;
    let token = app.logged_in("a@x.com").await;

    let response = app.with_cookie("GET", "/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "a@x.com");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_me_for_deleted_user() {
    let app = test_app().await;
    let issued = JwtUtils::new(SECRET, TWELVE_HOURS)
        .generate_token("no-such-user")
        .unwrap();

    let response = app.with_cookie("GET", "/me", &issued.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
