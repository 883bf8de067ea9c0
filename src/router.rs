use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;

use crate::db::{CredentialStore, ProjectStore};
use crate::handlers::{auth, pages, projects, recovery, uploads};
use crate::service::mailer::MailRelay;
use crate::storage::AssetStore;

/// Uploads are whole 3D models; bound the body rather than streaming.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: ProjectStore,
    pub creds: CredentialStore,
    pub assets: Arc<AssetStore>,
    pub mailer: Arc<MailRelay>,
    pub key: Key,
    pub otp_ttl_secs: i64,
}

impl AppState {
    pub fn new(
        db: ProjectStore,
        creds: CredentialStore,
        assets: Arc<AssetStore>,
        mailer: Arc<MailRelay>,
        key: Key,
        otp_ttl_secs: i64,
    ) -> Self {
        Self {
            db,
            creds,
            assets,
            mailer,
            key,
            otp_ttl_secs,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/create", get(projects::create))
        .route("/verify-pin", post(auth::verify_pin))
        .route("/save", post(projects::save))
        .route("/delete/{id}", get(projects::delete))
        .route("/logout", get(auth::logout))
        .route("/image-ar/{id}", get(pages::image_ar))
        .route("/model-ar/{id}", get(pages::model_ar))
        .route("/wall-ar", get(pages::wall_ar))
        .route("/uploads/{filename}", get(uploads::serve_upload))
        .route("/forgot", get(recovery::forgot))
        .route("/send-otp", post(recovery::send_otp))
        .route("/reset-pin", get(recovery::reset_pin))
        .route("/save-pin", post(recovery::save_pin))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
