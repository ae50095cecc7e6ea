//! Request handler module
//!
//! Fixture routing and the generated pages (sitemap, home page).

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
