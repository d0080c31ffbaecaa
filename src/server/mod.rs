// Server module entry point
// Hosting layer: listener, connections, accept loop and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// loop is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use connection::serve_request;
pub use listener::create_listener;
pub use server_loop::run;
pub use signal::start_signal_handler;
