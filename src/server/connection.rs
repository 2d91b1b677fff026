// Connection handling module
// Serves a single TCP connection with hyper's HTTP/1 implementation

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection to completion.
///
/// Keep-alive is only enabled in concurrent mode; in one-at-a-time mode each
/// connection is closed after its response.
/// A non-zero `performance.connection_timeout` bounds the whole exchange.
pub async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let io = TokioIo::new(stream);
    let keep_alive = state.config.server.concurrent;
    let timeout_secs = state.config.performance.connection_timeout;

    let mut builder = http1::Builder::new();
    builder.keep_alive(keep_alive);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );

    let result = if timeout_secs > 0 {
        match tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await {
            Ok(r) => r,
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {timeout_secs} seconds"
                ));
                return;
            }
        }
    } else {
        conn.await
    };

    if let Err(err) = result {
        logger::log_connection_error(&err);
    }
}

/// Serve a connection on its own task (concurrent mode)
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(serve_connection(stream, peer_addr, state));
}
