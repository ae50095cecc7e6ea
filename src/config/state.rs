// Application state module
// Immutable state shared by every connection task

use super::types::Config;
use crate::fixtures::{FixtureTable, Site};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Site the router renders; never mutated after startup
    pub site: Site,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let site = Site::new(&config.server.host, config.server.port, FixtureTable::default());
        Self { config, site }
    }

    /// State for a server whose actual port differs from the configured one
    /// (e.g. bound to port 0)
    #[cfg(test)]
    pub fn with_port(mut config: Config, port: u16) -> Self {
        config.server.port = port;
        Self::new(config)
    }
}
