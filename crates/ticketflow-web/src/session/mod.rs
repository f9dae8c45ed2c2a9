pub mod store;

pub use store::DashMapStore;

use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::ServerConfig;

/// Key under which the visitor's ticket session is kept in the cookie
/// session.
pub const STATE_KEY: &str = "ticketflow.session";

/// Cookie session layer. The cookie and the stored record are refreshed on
/// every response, so both expire only after `ttl_seconds` of inactivity.
pub fn layer(config: &ServerConfig, store: DashMapStore) -> SessionManagerLayer<DashMapStore> {
    let ttl = i64::try_from(config.session.ttl_seconds).unwrap_or(i64::MAX);
    SessionManagerLayer::new(store)
        .with_name(config.session.cookie_name.clone())
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookie())
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(ttl)))
}
