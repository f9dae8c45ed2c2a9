use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::render;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                tracing::debug!("Not found: {what}");
                (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
            }
            AppError::Internal(msg) => {
                // Log the real error server-side, return a generic page to the client
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::internal_error_page()),
                )
                    .into_response()
            }
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("session error: {e}"))
    }
}
