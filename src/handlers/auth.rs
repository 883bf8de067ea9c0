use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::middleware::gate;
use crate::router::AppState;
use crate::service::pin;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct VerifyPinForm {
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub next_page: String,
}

pub async fn verify_pin(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<VerifyPinForm>,
) -> Result<Response, AppError> {
    let credential = state.creds.get().await?;
    let next = safe_next(&form.next_page);

    if pin::verify_pin(&form.pin, &credential.pin_hash) {
        info!("PIN accepted, gate opened");
        let jar = gate::open(jar);
        return Ok((jar, Redirect::to(next)).into_response());
    }

    // Re-render the form; the gate cookie stays untouched.
    Ok(Html(views::pin_page(next, true)).into_response())
}

pub async fn logout(jar: PrivateCookieJar) -> Response {
    let jar = gate::close(jar);
    (jar, Redirect::to("/")).into_response()
}

/// Only site-local targets are followed after PIN entry.
fn safe_next(next_page: &str) -> &str {
    if next_page.starts_with('/') && !next_page.starts_with("//") {
        next_page
    } else {
        "/"
    }
}
