//! textserve
//!
//! A static file server that reports every file as `text/plain`, so source
//! files open inline in a browser instead of downloading or rendering.
//!
//! ```no_run
//! use textserve::{AppState, Config, Server};
//!
//! # async fn run() -> Result<(), textserve::ServerError> {
//! let state = AppState::new(Config::for_root("/srv/drivers"))?;
//! let server = Server::bind(state)?;
//! let shutdown = server.shutdown_handle();
//! tokio::spawn(server.run());
//! // ...
//! shutdown.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{AppState, Config};
pub use crate::error::ServerError;
pub use crate::http::{PlainText, TypeGuesser};
pub use crate::server::{Server, ShutdownHandle};
