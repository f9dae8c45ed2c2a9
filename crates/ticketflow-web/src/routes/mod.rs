mod pages;

use axum::routing::{any, get};
use axum::Router;

use crate::state::AppState;
use crate::static_files;

/// Signup and login. Split out so the server can rate-limit them.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", any(pages::handle))
        .route("/auth/login", any(pages::handle))
}

/// Static assets plus every other page, all dispatched by the core.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/assets/{*path}", get(static_files::static_handler))
        .fallback(pages::handle)
}
