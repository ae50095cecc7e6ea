//! Fixture table
//!
//! Ordered mapping from path key (`page404`) to the status code that path
//! answers with.

use hyper::StatusCode;

/// Fixtures served by default, in sitemap order
const DEFAULT_FIXTURES: &[(&str, StatusCode)] = &[
    ("page301", StatusCode::MOVED_PERMANENTLY),
    ("page302", StatusCode::FOUND),
    ("page303", StatusCode::SEE_OTHER),
    ("page307", StatusCode::TEMPORARY_REDIRECT),
    ("page308", StatusCode::PERMANENT_REDIRECT),
    ("page400", StatusCode::BAD_REQUEST),
    ("page401", StatusCode::UNAUTHORIZED),
    ("page403", StatusCode::FORBIDDEN),
    ("page404", StatusCode::NOT_FOUND),
    ("page500", StatusCode::INTERNAL_SERVER_ERROR),
    ("page502", StatusCode::BAD_GATEWAY),
    ("page503", StatusCode::SERVICE_UNAVAILABLE),
    ("page504", StatusCode::GATEWAY_TIMEOUT),
];

/// A single named endpoint with a canned status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub key: &'static str,
    pub status: StatusCode,
}

impl Fixture {
    /// Redirect-class fixtures carry a `Location` header
    pub fn is_redirect(&self) -> bool {
        matches!(self.status.as_u16(), 301 | 302 | 303 | 307 | 308)
    }
}

/// Immutable, ordered fixture table
#[derive(Debug, Clone)]
pub struct FixtureTable {
    fixtures: Vec<Fixture>,
}

#[allow(clippy::len_without_is_empty)]
impl FixtureTable {
    pub fn new(entries: &[(&'static str, StatusCode)]) -> Self {
        let mut fixtures: Vec<Fixture> = Vec::with_capacity(entries.len());
        for &(key, status) in entries {
            // First definition of a key wins
            if fixtures.iter().all(|f| f.key != key) {
                fixtures.push(Fixture { key, status });
            }
        }
        Self { fixtures }
    }

    /// Find the fixture for a path key (no leading slash)
    pub fn lookup(&self, key: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.key == key)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Fixtures in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter()
    }

    /// Fixtures sorted lexicographically by key
    pub fn sorted(&self) -> Vec<&Fixture> {
        let mut sorted: Vec<&Fixture> = self.fixtures.iter().collect();
        sorted.sort_by_key(|f| f.key);
        sorted
    }
}

impl Default for FixtureTable {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURES)
    }
}
