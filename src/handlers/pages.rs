use axum::extract::{Path, State};
use axum::response::Html;

use crate::error::AppError;
use crate::db::ProjectKind;
use crate::router::AppState;
use crate::service::lifecycle;
use crate::views;

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let projects = state.db.list().await?;
    Ok(Html(views::dashboard_page(&projects)))
}

pub async fn image_ar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let project = lifecycle::viewer_project(&state.db, id, ProjectKind::Image).await?;
    let asset_url = state.assets.public_url(&project.file_ref);
    Ok(Html(views::image_viewer_page(&project, &asset_url)))
}

pub async fn model_ar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let project = lifecycle::viewer_project(&state.db, id, ProjectKind::Model).await?;
    let asset_url = state.assets.public_url(&project.file_ref);
    Ok(Html(views::model_viewer_page(&project, &asset_url)))
}

pub async fn wall_ar() -> Html<String> {
    Html(views::wall_ar_page())
}
