use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

use crate::error::AppError;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// Serves `/assets/{*path}` from the files embedded at build time.
pub async fn static_handler(Path(path): Path<String>) -> Result<Response, AppError> {
    let content = Assets::get(&path).ok_or_else(|| AppError::NotFound(format!("asset {path}")))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        content.data.into_owned(),
    )
        .into_response())
}
