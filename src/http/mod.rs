//! HTTP protocol layer module
//!
//! Response builders shared by the fixture router, decoupled from routing.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_204_response, build_404_response, build_fixture_response, build_html_response,
    build_xml_response,
};
