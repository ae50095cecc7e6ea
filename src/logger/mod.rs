//! Logger module
//!
//! Provides logging utilities for the fixture server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error, warning and debug logging filtered by level
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Log verbosity, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a configured level name; unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        LogLevel::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn enabled(level: LogLevel) -> bool {
    let configured = writer::get().map_or(LogLevel::Info, writer::LogWriter::level);
    level <= configured
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    if !enabled(LogLevel::Info) {
        return;
    }
    write_info(&format!("[INFO] Bound to {addr}"));
    write_info(&format!("[INFO] Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[INFO] Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[INFO] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[INFO] Error log: {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

/// Peer went away mid-response; never more than a debug line
pub fn log_peer_disconnect(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    log_debug(&format!("[Connection] {peer_addr} disconnected: {err}"));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Debug) {
    log_warning(&format!("Failed to serve connection from {peer_addr}: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

pub fn log_info(message: &str) {
    if enabled(LogLevel::Info) {
        write_info(&format!("[INFO] {message}"));
    }
}

pub fn log_debug(message: &str) {
    if enabled(LogLevel::Debug) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

pub fn log_shutdown_started(active_connections: usize) {
    log_info(&format!(
        "Listener closed, waiting for {active_connections} active connection(s)"
    ));
}
