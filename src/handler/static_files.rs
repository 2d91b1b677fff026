//! Static file serving module
//!
//! Resolves request paths under the root and serves files, index files,
//! directory redirects and directory listings.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::path::{self, Resolved};
use crate::http::{self, cache};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Serve whatever the request path names under the root
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(decoded) = path::percent_decode(ctx.path) else {
        return http::build_404_response(ctx.is_head);
    };

    let candidate = path::join_under_root(&state.root, &decoded);
    let target = match path::resolve(&state.root, &candidate) {
        Resolved::Inside(p) => p,
        Resolved::Outside(p) => {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                ctx.path,
                p.display()
            ));
            return http::build_404_response(ctx.is_head);
        }
        Resolved::Missing(e) => return io_error_response(&e, ctx.is_head),
    };

    let metadata = match fs::metadata(&target).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, ctx.is_head),
    };

    if metadata.is_dir() {
        let display_path = String::from_utf8_lossy(&decoded);
        return serve_directory(ctx, state, &target, &display_path).await;
    }

    // A trailing slash names a directory, never a file
    if ctx.path.ends_with('/') {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, state, &target).await
}

/// Redirect to the slash-terminated URL, else serve an index file, else list
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
    display_path: &str,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &state.config.http.index_files {
        let candidate = dir.join(index_file);
        if let Resolved::Inside(index_path) = path::resolve(&state.root, &candidate) {
            if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
                return serve_file(ctx, state, &index_path).await;
            }
        }
    }

    if !state.config.http.directory_listing {
        return http::build_403_response(ctx.is_head);
    }

    listing::serve_listing(dir, display_path, ctx.is_head).await
}

/// Serve a regular file with the configured content-type strategy
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(file_path).await {
        Ok(m) => m,
        Err(e) => return io_error_response(&e, ctx.is_head),
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::http_date);
    if let (Some(m), Some(lm)) = (modified, last_modified.as_deref()) {
        if cache::check_not_modified(ctx.if_modified_since, m) {
            return http::build_304_response(lm);
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != io::ErrorKind::PermissionDenied {
                logger::log_error(&format!(
                    "Failed to read file '{}': {}",
                    file_path.display(),
                    e
                ));
            }
            return io_error_response(&e, ctx.is_head);
        }
    };

    let content_type = state.guesser.guess(file_path);
    http::build_file_response(
        Bytes::from(content),
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Map a filesystem error to the status the client sees
///
/// Permission problems are 403; everything else means the file is unavailable (404).
pub fn io_error_response(error: &io::Error, is_head: bool) -> Response<Full<Bytes>> {
    match error.kind() {
        io::ErrorKind::PermissionDenied => http::build_403_response(is_head),
        _ => http::build_404_response(is_head),
    }
}
