use std::sync::Arc;

use crate::database::{DatabaseManager, FavsStore, UserStore};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub favs: Arc<dyn FavsStore>,
    pub users: Arc<dyn UserStore>,
    pub database: Arc<DatabaseManager>,
}

impl AppState {
    pub fn new(manager: DatabaseManager) -> Self {
        Self {
            favs: manager.favs(),
            users: manager.users(),
            database: Arc::new(manager),
        }
    }
}
