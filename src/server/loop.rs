// Server loop module
// Accepts connections until shutdown, then drains the active ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::PerformanceConfig;
use crate::handler::App;
use crate::logger;

/// How often the drain phase checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
pub async fn run(
    listener: TcpListener,
    app: Arc<App>,
    performance: PerformanceConfig,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &app,
                            &active_connections,
                            &performance,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before waiting on in-flight connections
    drop(listener);

    let grace = Duration::from_secs(performance.write_timeout);
    let remaining = drain_connections(&active_connections, grace).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutdown grace period elapsed with {remaining} connection(s) still open"
        ));
    } else {
        logger::log_info("All connections closed");
    }
}

/// Wait until no connection is active or `grace` has elapsed.
///
/// Returns the number of connections still open.
pub async fn drain_connections(active: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let open = active.load(Ordering::SeqCst);
        if open == 0 || tokio::time::Instant::now() >= deadline {
            return open;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
