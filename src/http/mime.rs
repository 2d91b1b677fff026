//! Content-type strategy module
//!
//! Every file response asks a [`TypeGuesser`] for its `Content-Type`. The
//! server ships with [`PlainText`], which ignores the path entirely so that
//! scripts, markup and data files are all displayed inline by browsers.

use std::path::Path;

/// The type reported for every served file
pub const TEXT_PLAIN: &str = "text/plain";

/// Maps a filesystem path to the `Content-Type` it is served with
pub trait TypeGuesser: Send + Sync {
    fn guess(&self, path: &Path) -> &'static str;
}

/// Reports `text/plain` for every path, whatever its extension
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl TypeGuesser for PlainText {
    fn guess(&self, _path: &Path) -> &'static str {
        TEXT_PLAIN
    }
}

impl<F> TypeGuesser for F
where
    F: Fn(&Path) -> &'static str + Send + Sync,
{
    fn guess(&self, path: &Path) -> &'static str {
        self(path)
    }
}
