// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Notify,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Request shutdown; the permit is kept until the server loop picks it up
    pub fn trigger_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix only)
///
/// SIGTERM and SIGINT are registered before this returns, then a background
/// task triggers shutdown on the first one. If registration fails the task
/// falls back to Ctrl+C so an interrupt still stops the server.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    let signals = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(term), Ok(int)) => Some((term, int)),
        (Err(e), _) | (_, Err(e)) => {
            logger::log_error(&format!(
                "Failed to register signal handlers: {e}, falling back to Ctrl+C"
            ));
            None
        }
    };

    tokio::spawn(async move {
        let Some((mut sigterm, mut sigint)) = signals else {
            wait_for_ctrl_c(&handler).await;
            return;
        };

        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };

        logger::log_debug(&format!("[SIGNAL] {name} received, initiating graceful shutdown"));
        handler.trigger_shutdown();
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move { wait_for_ctrl_c(&handler).await });
}

async fn wait_for_ctrl_c(handler: &SignalHandler) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            logger::log_debug("[SIGNAL] Ctrl+C received, initiating graceful shutdown");
            handler.trigger_shutdown();
        }
        Err(e) => logger::log_error(&format!("Failed to register Ctrl+C handler: {e}")),
    }
}
