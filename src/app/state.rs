//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::rooms::RoomManager;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub rooms: Arc<RoomManager>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        // Initialize room manager
        let rooms = Arc::new(RoomManager::from_config(&config));

        Self { config, rooms }
    }
}
