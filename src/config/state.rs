// Application state module
// Immutable per-process state shared by every request

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::types::Config;
use crate::error::ServerError;
use crate::http::mime::{PlainText, TypeGuesser};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.server.root`
    pub root: PathBuf,
    /// Content-type strategy applied to every served file
    pub guesser: Arc<dyn TypeGuesser>,
}

impl AppState {
    /// Create `AppState` with the `text/plain` override
    pub fn new(config: Config) -> Result<Self, ServerError> {
        Self::with_guesser(config, Arc::new(PlainText))
    }

    /// Create `AppState` with a custom content-type strategy
    ///
    /// Fails when the root directory is missing or is not a directory.
    pub fn with_guesser(
        config: Config,
        guesser: Arc<dyn TypeGuesser>,
    ) -> Result<Self, ServerError> {
        let root = canonical_root(&config.server.root)?;
        Ok(Self {
            config,
            root,
            guesser,
        })
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, ServerError> {
    let canonical = root
        .canonicalize()
        .map_err(|source| ServerError::RootDirectory {
            path: root.to_path_buf(),
            source,
        })?;
    if !canonical.is_dir() {
        return Err(ServerError::RootDirectory {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    Ok(canonical)
}
