use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("PIN verification required")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("upstream call failed: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html(views::error_page("Not found", "No such project or file.")),
            )
                .into_response(),

            // Protected pages bounce to the PIN form instead of erroring.
            AppError::Unauthorized => Redirect::to("/create").into_response(),

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Html(views::error_page("Invalid request", &msg)),
            )
                .into_response(),

            AppError::Upstream(msg) => {
                error!(error = %msg, "upstream call failed");
                upstream_response()
            }

            AppError::Reqwest(e) => {
                error!(error = %e, "outbound HTTP request failed");
                upstream_response()
            }

            AppError::Database(e) => internal_response(&e),
            AppError::Io(e) => internal_response(&e),
            AppError::ObjectStore(e) => internal_response(&e),
            AppError::UrlParse(e) => internal_response(&e),
            AppError::Config(msg) => {
                error!(error = %msg, "configuration error");
                internal_page()
            }
        }
    }
}

fn internal_response(e: &dyn std::error::Error) -> Response {
    error!(error = %e, "internal error");
    internal_page()
}

fn internal_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::error_page("Server error", "An internal error occurred.")),
    )
        .into_response()
}

fn upstream_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html(views::error_page(
            "Upstream failure",
            "An external service did not respond. Nothing was changed.",
        )),
    )
        .into_response()
}
