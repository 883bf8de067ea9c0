use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::debug;

use crate::db::ProjectKind;
use crate::error::AppError;
use crate::middleware::gate::{self, Gate};
use crate::router::AppState;
use crate::service::lifecycle;
use crate::views;

/// PIN form when the gate is closed, upload form once it is open.
pub async fn create(jar: PrivateCookieJar) -> Html<String> {
    if gate::is_open(&jar) {
        Html(views::upload_page())
    } else {
        Html(views::pin_page("/create", false))
    }
}

pub async fn save(
    State(state): State<AppState>,
    gate: Gate,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut name = String::new();
    let mut kind_raw = String::new();
    let mut file_name = String::new();
    let mut payload: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?;
            }
            "type" => {
                kind_raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?;
            }
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_string();
                payload = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed upload: {e}")))?
                    .to_vec();
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    let kind = ProjectKind::parse(&kind_raw)
        .ok_or_else(|| AppError::Validation(format!("unknown project type: {kind_raw}")))?;

    lifecycle::save_project(
        gate,
        &state.db,
        &state.assets,
        &name,
        kind,
        &file_name,
        &payload,
    )
    .await?;

    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    gate: Gate,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    lifecycle::delete_project(gate, &state.db, &state.assets, id).await?;
    Ok(Redirect::to("/").into_response())
}
