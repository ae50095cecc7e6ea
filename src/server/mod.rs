// Server module entry point
// Listener creation, connection handling, signal handling and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
