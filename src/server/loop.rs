// Server loop module
// Accepts connections until shutdown, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Main server loop
///
/// Accepts connections until `signals` requests shutdown, then closes the
/// listener and gives in-flight connections up to
/// `performance.shutdown_timeout` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    signals: Arc<SignalHandler>,
) {
    let graceful = GracefulShutdown::new();
    let active_connections = Arc::new(AtomicUsize::new(0));

    while !signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    if tokio::time::timeout(grace, graceful.shutdown()).await.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, closing anyway",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppState;
    use crate::server::create_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::task::JoinHandle;

    async fn spawn_server() -> (SocketAddr, Arc<SignalHandler>, JoinHandle<()>) {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut cfg = config::default_config();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::with_port(cfg, addr.port()));

        let signals = Arc::new(SignalHandler::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&signals)));
        (addr, signals, server)
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    async fn stop(signals: &SignalHandler, server: JoinHandle<()>) {
        signals.trigger_shutdown();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server loop should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_serves_fixtures_over_tcp() {
        let (addr, signals, server) = spawn_server().await;

        let response = get(addr, "/page301").await;
        assert!(response.starts_with("HTTP/1.1 301 Moved Permanently\r\n"));
        let location = format!("location: http://127.0.0.1:{}/\r\n", addr.port());
        assert!(response.to_ascii_lowercase().contains(&location));
        assert!(response.ends_with("This is '/page301', returning HTTP 301"));

        let response = get(addr, "/page504").await;
        assert!(response.starts_with("HTTP/1.1 504 Gateway Timeout\r\n"));
        assert!(!response.to_ascii_lowercase().contains("location:"));

        let response = get(addr, "/nonexistent").await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.ends_with("\r\n\r\nNot found"));

        let response = get(addr, "/sitemap.xml").await;
        let loc = format!("<loc>http://127.0.0.1:{}/page308</loc>", addr.port());
        assert!(response.contains(&loc));

        stop(&signals, server).await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_listener() {
        let (addr, signals, server) = spawn_server().await;
        stop(&signals, server).await;
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_aborted_client_does_not_stop_server() {
        let (addr, signals, server) = spawn_server().await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /page302 HTTP/1.1\r\nHo").await.unwrap();
        drop(stream);

        let response = get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("href=\"/sitemap.xml\""));

        stop(&signals, server).await;
    }

    #[tokio::test]
    async fn test_idle_keep_alive_does_not_block_shutdown() {
        let (addr, signals, server) = spawn_server().await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /favicon.ico HTTP/1.1\r\nHost: fixtures\r\n\r\n")
            .await
            .unwrap();
        let mut buf = [0u8; 512];
        let n = stream.read(&mut buf).await.unwrap();
        assert!(buf[..n].starts_with(b"HTTP/1.1 204 No Content\r\n"));

        stop(&signals, server).await;

        // Server side closed the idle connection
        let n = stream.read(&mut buf).await.unwrap_or(0);
        assert_eq!(n, 0);
    }
}
