// Connection handling module
// Serves a single accepted TCP connection in its own task

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpStream;

use crate::config;
use crate::handler;
use crate::logger;

/// Accept a connection and serve it in a spawned task.
///
/// The connection is registered with `graceful` so shutdown can ask it to
/// finish its in-flight request and close.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter, decremented when the task ends
/// * `graceful` - Shutdown watcher for in-flight connections
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);
    logger::log_connection_accepted(&peer_addr);

    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(state.config.performance.keep_alive);

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        }),
    );
    let conn = graceful.watch(conn);

    let conn_counter = Arc::clone(conn_counter);
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            if is_peer_disconnect(&err) {
                logger::log_peer_disconnect(&peer_addr, &err);
            } else {
                logger::log_connection_error(&peer_addr, &err);
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Whether a connection error only means the client went away
///
/// These are expected for a test target (clients abort redirects, crawlers
/// hang up early) and are discarded.
fn is_peer_disconnect(err: &hyper::Error) -> bool {
    if err.is_incomplete_message() || err.is_canceled() || err.is_body_write_aborted() {
        return true;
    }

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return is_disconnect_kind(io_err.kind());
        }
        source = cause.source();
    }
    false
}

const fn is_disconnect_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    )
}
