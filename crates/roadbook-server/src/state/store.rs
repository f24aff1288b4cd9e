//! Shared server state: database handle plus per-route mutation locks.

use crate::config::Config;
use crate::persistence::Database;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across request handlers.
pub struct AppState {
    db: Database,
    config: Config,
    route_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            route_locks: DashMap::new(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock guarding mutations of one route.
    ///
    /// Every mutation reads the full current ordering before computing shifts,
    /// so mutations of the same route must be serialized. Different routes get
    /// independent locks and proceed in parallel.
    pub fn route_lock(&self, route_id: &str) -> Arc<Mutex<()>> {
        self.route_locks
            .entry(route_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry once a route is gone.
    pub fn forget_route_lock(&self, route_id: &str) {
        self.route_locks.remove(route_id);
    }
}
