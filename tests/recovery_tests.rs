mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use url::Url;

use arstage::service::pin;
use arstage::service::recovery::{CHALLENGE_COOKIE, Challenge};
use common::*;

/// Minimal HTTP relay stub: answers every POST with 200 and no body.
async fn spawn_stub_relay() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub relay");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let Ok(n) = sock.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if request_complete(&buf) {
                        break;
                    }
                }
                let _ = sock
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
            });
        }
    });

    Url::parse(&format!("http://{addr}/send")).expect("relay url")
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&buf[..header_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

/// Encode a challenge the way the `/send-otp` handler would, so reset
/// submissions can be tested with a known code.
fn challenge_cookie(challenge: &Challenge) -> String {
    let jar = PrivateCookieJar::new(pin::cookie_key(TEST_SECRET))
        .add(Cookie::new(CHALLENGE_COOKIE, challenge.encode()));
    let resp = (jar, "").into_response();
    first_cookie(&resp)
}

#[tokio::test]
async fn send_otp_sets_a_challenge_and_redirects() {
    let relay = spawn_stub_relay().await;
    let app = spawn_app_with_relay(Some(relay)).await;

    let resp = post_form(&app.router, "/send-otp", "email=admin%40email.com", None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/reset-pin");
    let cookie = first_cookie(&resp);
    assert!(cookie.starts_with(&format!("{CHALLENGE_COOKIE}=")));

    app.cleanup();
}

#[tokio::test]
async fn send_otp_invalidates_the_challenge_when_delivery_fails() {
    // No relay configured: every send fails upstream.
    let app = spawn_app().await;

    let resp = post_form(&app.router, "/send-otp", "email=admin%40email.com", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let cookie = first_cookie(&resp);
    assert!(
        cookie.starts_with(&format!("{CHALLENGE_COOKIE}=")) && cookie.ends_with('='),
        "a failed delivery must clear the challenge cookie, got: {cookie}"
    );

    app.cleanup();
}

#[tokio::test]
async fn send_otp_rejects_a_bad_email() {
    let app = spawn_app().await;
    let resp = post_form(&app.router, "/send-otp", "email=not-an-address", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    app.cleanup();
}

#[tokio::test]
async fn reset_with_the_correct_code_replaces_the_pin() {
    let app = spawn_app().await;

    let challenge = Challenge::issue("new-admin@email.com".to_string());
    let cookie = challenge_cookie(&challenge);

    let resp = post_form(
        &app.router,
        "/save-pin",
        &format!("code={}&pin=9999", challenge.code),
        Some(&cookie),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    // Old PIN is gone, the new one opens the gate.
    let old = post_form(&app.router, "/verify-pin", "pin=1234&next_page=/", None).await;
    assert_eq!(old.status(), StatusCode::OK);
    let new = post_form(&app.router, "/verify-pin", "pin=9999&next_page=/", None).await;
    assert_eq!(new.status(), StatusCode::SEE_OTHER);

    let credential = app.state.creds.get().await.expect("credential");
    assert_eq!(credential.email.as_deref(), Some("new-admin@email.com"));

    app.cleanup();
}

#[tokio::test]
async fn a_wrong_code_burns_the_challenge() {
    let app = spawn_app().await;

    let challenge = Challenge::issue("admin@email.com".to_string());
    let wrong = if challenge.code == "1000" { "1001" } else { "1000" };
    let cookie = challenge_cookie(&challenge);

    let resp = post_form(
        &app.router,
        "/save-pin",
        &format!("code={wrong}&pin=9999"),
        Some(&cookie),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let cleared = first_cookie(&resp);
    assert!(
        cleared.starts_with(&format!("{CHALLENGE_COOKIE}=")) && cleared.ends_with('='),
        "the challenge must be consumed even on a wrong code, got: {cleared}"
    );

    // The PIN is unchanged.
    let unlock = post_form(&app.router, "/verify-pin", "pin=1234&next_page=/", None).await;
    assert_eq!(unlock.status(), StatusCode::SEE_OTHER);

    app.cleanup();
}

#[tokio::test]
async fn an_expired_code_is_rejected() {
    let app = spawn_app().await;

    let mut challenge = Challenge::issue("admin@email.com".to_string());
    challenge.issued_at -= 3600; // well past the 600 s test TTL
    let cookie = challenge_cookie(&challenge);

    let resp = post_form(
        &app.router,
        "/save-pin",
        &format!("code={}&pin=9999", challenge.code),
        Some(&cookie),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(resp).await.contains("expired"));

    app.cleanup();
}

#[tokio::test]
async fn reset_without_a_challenge_is_rejected() {
    let app = spawn_app().await;
    let resp = post_form(&app.router, "/save-pin", "code=1234&pin=9999", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    app.cleanup();
}

#[tokio::test]
async fn recovery_pages_render() {
    let app = spawn_app().await;
    let forgot = get(&app.router, "/forgot", None).await;
    assert_eq!(forgot.status(), StatusCode::OK);
    assert!(body_string(forgot).await.contains("action=\"/send-otp\""));

    let reset = get(&app.router, "/reset-pin", None).await;
    assert_eq!(reset.status(), StatusCode::OK);
    assert!(body_string(reset).await.contains("action=\"/save-pin\""));
    app.cleanup();
}
