// Server loop module
// Owns the listener and accepts connections until shutdown is requested

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::{serve_connection, spawn_connection};
use super::listener::create_listener;
use super::shutdown::ShutdownHandle;
use crate::config::AppState;
use crate::error::ServerError;
use crate::logger;

/// A bound, not yet running, file server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the configured address.
    ///
    /// Fails with [`ServerError::Bind`] when the port is already taken.
    /// Must be called from within a Tokio runtime.
    pub fn bind(state: AppState) -> Result<Self, ServerError> {
        let addr = state.config.socket_addr()?;
        let listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            local_addr,
            state: Arc::new(state),
            shutdown: ShutdownHandle::new(),
        })
    }

    /// Actual bound address (resolves port 0 to the assigned port)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle that stops [`Server::run`] when triggered
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accept and serve connections until shutdown is requested.
    ///
    /// In the default mode each connection is served to completion before the
    /// next one is accepted; with `server.concurrent` each gets its own task.
    /// The listener is closed when this returns.
    #[allow(clippy::ignored_unit_patterns)]
    pub async fn run(self) {
        let Self {
            listener,
            local_addr,
            state,
            shutdown,
        } = self;
        let concurrent = state.config.server.concurrent;

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,

                accept_result = listener.accept() => {
                    let (stream, peer_addr) = match accept_result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                            continue;
                        }
                    };

                    if concurrent {
                        spawn_connection(stream, peer_addr, Arc::clone(&state));
                        continue;
                    }

                    tokio::select! {
                        _ = shutdown.wait() => break,
                        _ = serve_connection(stream, peer_addr, Arc::clone(&state)) => {}
                    }
                }
            }
        }

        drop(listener);
        logger::log_shutdown(&local_addr);
    }
}
