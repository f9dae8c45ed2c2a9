use std::sync::Arc;

use ticketflow_core::Renderer;

use crate::config::ServerConfig;
use crate::render::HtmlRenderer;
use crate::session::DashMapStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub session_store: DashMapStore,
    pub renderer: Arc<dyn Renderer + Send + Sync>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            session_store: DashMapStore::new(),
            renderer: Arc::new(HtmlRenderer),
        }
    }
}
