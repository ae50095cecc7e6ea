//! Fixture module
//!
//! Holds the immutable fixture table and the site description the router
//! renders URLs from. Both are built once at startup and only read afterwards.

mod site;
mod table;

pub use site::Site;
pub use table::{Fixture, FixtureTable};
