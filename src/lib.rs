//! Upload-to-chart service: parses CSV and Excel files into typed tables,
//! profiles their columns, recommends a starting chart and serves the
//! interactive re-encode and filter operations over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::services::session::SessionStore;

// Application state
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
        }
    }
}
