//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, request
//! context extraction, dispatch to the file responder and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Path as sent by the client, still percent-encoded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head: parts.method == Method::HEAD,
                if_modified_since: header_str(&parts, "if-modified-since"),
            };
            static_files::serve_path(&ctx, &state).await
        }
    };

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Only GET and HEAD are served; everything else is 501
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => Some(http::build_501_response()),
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_default();
    entry.referer = header_str(parts, "referer").map(ToString::to_string);
    entry.user_agent = header_str(parts, "user-agent").map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "textserve-router-{name}-{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn state_for(root: &TempRoot) -> Arc<AppState> {
        let mut cfg = Config::for_root(&root.0);
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    #[tokio::test]
    async fn test_every_extension_is_text_plain() {
        let root = TempRoot::new("ext");
        for name in ["a.txt", "b.json", "c.html", "d.groovy"] {
            std::fs::write(root.0.join(name), format!("contents of {name}")).unwrap();
        }
        let state = state_for(&root);

        for name in ["a.txt", "b.json", "c.html", "d.groovy"] {
            let resp = send(&state, Method::GET, &format!("/{name}")).await;
            assert_eq!(resp.status(), 200, "{name}");
            assert_eq!(resp.headers()["content-type"], "text/plain", "{name}");
            let body = resp.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(body, format!("contents of {name}").as_bytes());
        }
    }

    #[tokio::test]
    async fn test_server_header() {
        let root = TempRoot::new("server");
        let state = state_for(&root);
        let resp = send(&state, Method::GET, "/missing").await;
        assert_eq!(resp.status(), 404);
        assert!(resp.headers()["server"]
            .to_str()
            .unwrap()
            .starts_with("textserve/"));
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let root = TempRoot::new("method");
        std::fs::write(root.0.join("a.txt"), "a").unwrap();
        let state = state_for(&root);

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
            let resp = send(&state, method.clone(), "/a.txt").await;
            assert_eq!(resp.status(), 501, "{method}");
            assert_eq!(resp.headers()["allow"], "GET, HEAD");
        }
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_label(hyper::Version::HTTP_11), "1.1");
    }
}
