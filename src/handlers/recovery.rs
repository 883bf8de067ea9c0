use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::gate::{expired_cookie, session_cookie};
use crate::router::AppState;
use crate::service::pin;
use crate::service::recovery::{CHALLENGE_COOKIE, Challenge};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SendOtpForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePinForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub pin: String,
}

pub async fn forgot() -> Html<String> {
    Html(views::forgot_page())
}

pub async fn reset_pin() -> Html<String> {
    Html(views::reset_page())
}

/// Issue a fresh challenge (replacing any prior one) and mail the code.
/// A failed delivery invalidates the challenge instead of leaving it pending.
pub async fn send_otp(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<SendOtpForm>,
) -> Response {
    let email = form.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return AppError::Validation("a valid email address is required".to_string())
            .into_response();
    }

    let challenge = Challenge::issue(email.clone());
    let body = format!("Your one-time PIN reset code is {}.", challenge.code);

    match state.mailer.send(&email, "PIN reset code", &body).await {
        Ok(()) => {
            let jar = jar.add(session_cookie(
                CHALLENGE_COOKIE,
                challenge.encode(),
                Duration::seconds(state.otp_ttl_secs),
            ));
            (jar, Redirect::to("/reset-pin")).into_response()
        }
        Err(e) => {
            warn!(error = %e, "code delivery failed; challenge invalidated");
            let jar = jar.remove(expired_cookie(CHALLENGE_COOKIE));
            (jar, e.into_response()).into_response()
        }
    }
}

/// Verify the submitted code and overwrite the credential. The challenge is
/// consumed before the verdict, so a wrong guess also burns it.
pub async fn save_pin(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<SavePinForm>,
) -> Response {
    let (challenge, jar) = take_challenge(jar);
    let Some(challenge) = challenge else {
        return respond_with_error(
            jar,
            AppError::Validation("no pending reset code; request a new one".to_string()),
        );
    };

    if challenge.expired(state.otp_ttl_secs, chrono::Utc::now().timestamp()) {
        return respond_with_error(
            jar,
            AppError::Validation("the reset code expired; request a new one".to_string()),
        );
    }

    if !challenge.code_matches(form.code.trim()) {
        return respond_with_error(
            jar,
            AppError::Validation("incorrect reset code; request a new one".to_string()),
        );
    }

    let new_pin = form.pin.trim();
    if new_pin.is_empty() {
        return respond_with_error(
            jar,
            AppError::Validation("the new PIN must not be empty".to_string()),
        );
    }

    let result = state
        .creds
        .set(&pin::hash_pin(new_pin), Some(&challenge.email))
        .await;
    match result {
        Ok(()) => {
            info!(email = %challenge.email, "PIN reset completed");
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => respond_with_error(jar, e),
    }
}

/// Read and remove the challenge cookie in one step (strict single-use).
fn take_challenge(jar: PrivateCookieJar) -> (Option<Challenge>, PrivateCookieJar) {
    let challenge = jar
        .get(CHALLENGE_COOKIE)
        .and_then(|c| Challenge::decode(c.value()));
    let jar = jar.remove(expired_cookie(CHALLENGE_COOKIE));
    (challenge, jar)
}

fn respond_with_error(jar: PrivateCookieJar, err: AppError) -> Response {
    (jar, err.into_response()).into_response()
}
