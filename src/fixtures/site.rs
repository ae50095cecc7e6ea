//! Site description
//!
//! Base URL and fixture table the router renders links and redirects from.

use super::FixtureTable;

/// Immutable description of the served site
#[derive(Debug, Clone)]
pub struct Site {
    base_url: String,
    table: FixtureTable,
}

impl Site {
    pub fn new(host: &str, port: u16, table: FixtureTable) -> Self {
        // IPv6 literals need brackets inside a URL authority
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };

        Self {
            base_url: format!("http://{authority}/"),
            table,
        }
    }

    /// Root URL, always ending in `/`
    pub fn root_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a fixture key
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{key}", self.base_url)
    }

    pub const fn table(&self) -> &FixtureTable {
        &self.table
    }
}
