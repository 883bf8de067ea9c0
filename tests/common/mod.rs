#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use arstage::db::{CredentialStore, ProjectStore};
use arstage::router::AppState;
use arstage::service::mailer::MailRelay;
use arstage::service::pin;
use arstage::storage::AssetStore;
use url::Url;

pub const TEST_PIN: &str = "1234";
pub const TEST_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "X-ARSTAGE-TEST-BOUNDARY";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
    pub db_path: PathBuf,
}

impl TestApp {
    pub fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.db_path);
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_relay(None).await
}

/// Build the full router against a throwaway SQLite file and upload
/// directory. `relay` points the mailer at a stub relay endpoint; `None`
/// leaves it unconfigured so every delivery fails.
pub async fn spawn_app_with_relay(relay: Option<Url>) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let tag = format!("{}-{}", std::process::id(), nanos);

    let mut db_path = std::env::temp_dir();
    db_path.push(format!("arstage-test-{tag}.sqlite"));
    let mut upload_dir = std::env::temp_dir();
    upload_dir.push(format!("arstage-test-uploads-{tag}"));

    let database_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let db = ProjectStore::connect(&database_url).await.expect("connect db");
    db.init_schema().await.expect("init schema");

    let creds = CredentialStore::new(db.pool().clone());
    creds
        .seed(&pin::hash_pin(TEST_PIN), Some("admin@email.com"))
        .await
        .expect("seed credential");

    let assets = AssetStore::from_settings(None, None, &upload_dir).expect("asset store");
    let mailer =
        MailRelay::new(relay, None, "no-reply@test".to_string()).expect("mail relay");

    let state = AppState::new(
        db,
        creds,
        Arc::new(assets),
        Arc::new(mailer),
        pin::cookie_key(TEST_SECRET),
        600,
    );

    TestApp {
        router: arstage::app_router(state.clone()),
        state,
        upload_dir,
        db_path,
    }
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).expect("build request"))
        .await
        .expect("request failed")
}

pub async fn post_form(
    router: &Router,
    uri: &str,
    form: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(form.to_string())).expect("build request"))
        .await
        .expect("request failed")
}

pub async fn post_multipart(
    router: &Router,
    uri: &str,
    body: Vec<u8>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body)).expect("build request"))
        .await
        .expect("request failed")
}

/// Multipart body for the upload form: `name`, `type` and one `file` part.
pub fn upload_body(name: &str, kind: &str, file_name: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{kind}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Submit the correct PIN and return the gate cookie to replay.
pub async fn open_gate(router: &Router) -> String {
    let resp = post_form(
        router,
        "/verify-pin",
        &format!("pin={TEST_PIN}&next_page=/create"),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    first_cookie(&resp)
}

/// First `Set-Cookie` pair (`name=value`) of a response.
pub fn first_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("missing set-cookie header")
        .to_str()
        .expect("set-cookie was not utf-8")
        .split(';')
        .next()
        .expect("empty set-cookie header")
        .to_string()
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("missing location header")
        .to_str()
        .expect("location was not utf-8")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}
