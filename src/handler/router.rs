//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, fixture routing
//! and access logging.

use crate::config::AppState;
use crate::fixtures::Site;
use crate::handler::pages;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const FAVICON_PATH: &str = "/favicon.ico";
const SITEMAP_PATH: &str = "/sitemap.xml";

/// Main entry point for HTTP request handling
///
/// Only GET is routed; every other method (HEAD included) gets the
/// `Not found` fallback. Request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    // Query strings stay part of the routed path: `/page404?x=1` is not a fixture
    let target = req.uri().path_and_query().map_or("/", |pq| pq.as_str());

    let response = match *req.method() {
        Method::GET => route(target, &state.site),
        ref method => {
            logger::log_debug(&format!("Unrouted method {method} {target}"));
            http::build_404_response()
        }
    };

    let logging = &state.config.logging;
    if logging.access_log {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

/// Classify a request target (path plus any query) and build its canned
/// response
///
/// Total over all inputs: anything unmatched falls through to 404.
pub fn route(path: &str, site: &Site) -> Response<Full<Bytes>> {
    // 1. Favicon
    if path == FAVICON_PATH {
        return http::build_204_response();
    }

    // 2. Sitemap
    if path == SITEMAP_PATH {
        return http::build_xml_response(pages::render_sitemap(site));
    }

    // 3. Fixtures
    if let Some(fixture) = site.table().lookup(path.trim_start_matches('/')) {
        let code = fixture.status.as_u16();
        let location = fixture.is_redirect().then_some(site.root_url());
        let body = format!("This is '{path}', returning HTTP {code}");
        return http::build_fixture_response(fixture.status, location, body);
    }

    // 4. Home page
    if path.is_empty() || path == "/" {
        return http::build_html_response(pages::render_homepage(site));
    }

    // 5. Everything else
    http::build_404_response()
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(req, &REFERER);
    entry.user_agent = header_string(req, &USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_string<B>(req: &Request<B>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
