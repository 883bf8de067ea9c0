use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::router::AppState;

/// Serve a locally stored asset. With the object-store backend this route
/// finds nothing: clients fetch the public URL directly.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.assets.retrieve(&filename).await?;
    Ok(([(header::CONTENT_TYPE, mime_for(&filename))], bytes).into_response())
}

fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        "usdz" => "model/vnd.usdz+zip",
        "obj" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::mime_for;

    #[test]
    fn known_extensions_map_to_types() {
        assert_eq!(mime_for("wall.png"), "image/png");
        assert_eq!(mime_for("chair.GLB"), "model/gltf-binary");
        assert_eq!(mime_for("photo.JPEG"), "image/jpeg");
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(mime_for("archive.zip"), "application/octet-stream");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
