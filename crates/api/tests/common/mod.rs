#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use carbase_api::auth::jwt::{generate_access_token, JwtConfig};
use carbase_api::auth::password::hash_password;
use carbase_api::config::ServerConfig;
use carbase_api::router::build_app_router;
use carbase_api::state::AppState;
use carbase_db::models::user::CreateUser;
use carbase_db::repositories::UserRepo;
use carbase_db::store::{CarStore, PgCarStore};

pub const TEST_USERNAME: &str = "admin@example.com";
pub const TEST_PASSWORD: &str = "Admin@123";

const MULTIPART_BOUNDARY: &str = "carbase-test-boundary";

/// JWT settings shared by the app under test and by [`auth_token`].
pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` whose upload and log directories are unique
/// to this call.
pub fn test_config() -> ServerConfig {
    let scratch: PathBuf =
        std::env::temp_dir().join(format!("carbase-test-{}", uuid::Uuid::new_v4().simple()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt(),
        upload_dir: scratch.join("temp"),
        log_dir: scratch.join("logs"),
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// Build the full application router backed by Postgres.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let cars = Arc::new(PgCarStore::new(pool.clone()));
    build_test_app_with_store(pool, config, cars)
}

/// Build the router over an arbitrary car store. The pool still backs
/// login and the health check.
pub fn build_test_app_with_store(
    pool: PgPool,
    config: ServerConfig,
    cars: Arc<dyn CarStore>,
) -> Router {
    let state = AppState {
        pool,
        cars,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A bearer token accepted by the app under test.
pub fn auth_token() -> String {
    generate_access_token(1, TEST_USERNAME, &test_jwt()).expect("token generation should succeed")
}

/// Insert the standard test user.
pub async fn seed_user(pool: &PgPool) {
    let input = CreateUser {
        username: TEST_USERNAME.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create_if_absent(pool, &input)
        .await
        .expect("user creation should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

/// POST a single-file multipart form.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    token: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
) -> Response {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = builder(Method::POST, uri, Some(token))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}
