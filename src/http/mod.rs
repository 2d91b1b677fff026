//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! request handler: content-type strategy, path resolution, cache validation
//! and response builders.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use mime::{PlainText, TypeGuesser, TEXT_PLAIN};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_501_response,
    build_file_response, build_html_response, build_redirect_response,
};
