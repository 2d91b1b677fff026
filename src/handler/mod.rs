//! Request handler module
//!
//! Responsible for request dispatch and the static file responder.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
