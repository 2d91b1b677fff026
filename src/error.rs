//! Startup error types
//!
//! Per-request failures never surface here: they are turned into HTTP status
//! responses by the handler. Only conditions that stop the server from
//! starting are represented.

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },
    #[error("root directory '{}' is not usable: {source}", path.display())]
    RootDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("failed to open log file: {0}")]
    LogFile(std::io::Error),
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
}
