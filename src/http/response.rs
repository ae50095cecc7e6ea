//! HTTP response building module
//!
//! Provides builders for the canned responses the router hands out,
//! decoupled from routing decisions.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_XML: &str = "application/xml; charset=utf-8";

const NOT_FOUND_BODY: &str = "Not found";

/// Build 204 No Content response (no body, no content type)
pub fn build_204_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(Full::new(Bytes::from_static(NOT_FOUND_BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(NOT_FOUND_BODY.as_bytes())))
        })
}

/// Build a fixture response with an arbitrary status code
///
/// `location` is set for redirect-class fixtures only.
pub fn build_fixture_response(
    status: StatusCode,
    location: Option<&str>,
    body: String,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN);

    if let Some(target) = location {
        builder = builder.header(LOCATION, target);
    }

    builder.body(Full::new(Bytes::from(body))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> Response<Full<Bytes>> {
    build_document_response(content, TEXT_HTML)
}

/// Build XML document response
pub fn build_xml_response(content: String) -> Response<Full<Bytes>> {
    build_document_response(content, APPLICATION_XML)
}

fn build_document_response(content: String, content_type: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
