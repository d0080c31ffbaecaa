// Connection handling module
// Accepts TCP connections and serves them with the composed handler

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;

use crate::config::PerformanceConfig;
use crate::handler::{App, Handler, HttpResponse};
use crate::http;
use crate::logger;

/// Run one request through the handler chain
///
/// Failures the chain does not handle itself are logged and answered with
/// `500 Internal Server Error` and an empty body.
pub async fn serve_request<B, H>(app: &H, req: Request<B>) -> HttpResponse
where
    H: Handler<B>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match app.handle(req).await {
        Ok(resp) => resp,
        Err(e) => {
            logger::log_handler_failure(&method, &path, &e);
            http::build_500_response()
        }
    }
}

/// Accept a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `app` - The composed request handler
/// * `conn_counter` - Active connection counter
/// * `performance` - Timeouts and connection limit
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    app: &Arc<App>,
    conn_counter: &Arc<AtomicUsize>,
    performance: &PerformanceConfig,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    handle_connection(
        stream,
        Arc::clone(app),
        Arc::clone(conn_counter),
        performance,
    );
}

/// Serve a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive
/// 3. Serves the connection with the handler chain
/// 4. Applies timeout to the connection
/// 5. Decrements connection counter when done
fn handle_connection(
    stream: tokio::net::TcpStream,
    app: Arc<App>,
    conn_counter: Arc<AtomicUsize>,
    performance: &PerformanceConfig,
) {
    let keep_alive = performance.keep_alive_timeout > 0;
    let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let app = Arc::clone(&app);
                async move { Ok::<_, Infallible>(serve_request(app.as_ref(), req).await) }
            }),
        );

        // Bounds the whole connection, including time spent in the engine
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection timeout after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
