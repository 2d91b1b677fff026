//! Directory listing module
//!
//! Renders the HTML index page shown for directories without an index file.

use crate::handler::static_files::io_error_response;
use crate::http::{self, path};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Name as displayed, invalid UTF-8 replaced
    pub name: String,
    /// Name as stored on disk, used for the link target
    pub raw_name: Vec<u8>,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: `dir/` for directories, `name@` for symlinks
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target, directories keep their trailing slash
    fn link_name(&self) -> Vec<u8> {
        let mut link = self.raw_name.clone();
        if self.is_dir {
            link.push(b'/');
        }
        link
    }
}

/// Read `dir` and respond with its listing page
pub async fn serve_listing(dir: &Path, display_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match read_entries(dir).await {
        Ok(entries) => http::build_html_response(render_listing(display_path, &entries), is_head),
        Err(e) => io_error_response(&e, is_head),
    }
}

/// Collect directory entries sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy().into_owned();
        let raw_name = path::os_bytes(&file_name).into_owned();
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory is linked as one
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name,
            raw_name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (already percent-decoded)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            path::percent_encode(&entry.link_name()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            raw_name: name.as_bytes().to_vec(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let html = render_listing(
            "/drivers/",
            &[
                entry("Govee H6159.groovy", false, false),
                entry("lib", true, false),
                entry("latest", false, true),
            ],
        );
        assert!(html.contains("<title>Directory listing for /drivers/</title>"));
        assert!(html.contains("<h1>Directory listing for /drivers/</h1>"));
        assert!(html.contains(r#"<li><a href="Govee%20H6159.groovy">Govee H6159.groovy</a></li>"#));
        assert!(html.contains(r#"<li><a href="lib/">lib/</a></li>"#));
        assert!(html.contains(r#"<li><a href="latest">latest@</a></li>"#));
    }

    #[test]
    fn test_render_escapes_names() {
        let html = render_listing("/<x>/", &[entry("a&b<c>.txt", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(r#"<a href="a%26b%3Cc%3E.txt">a&amp;b&lt;c&gt;.txt</a>"#));
    }

    #[test]
    fn test_link_uses_on_disk_bytes() {
        let drv = ListingEntry {
            name: "drv\u{FFFD}.groovy".to_string(),
            raw_name: b"drv\xff.groovy".to_vec(),
            is_dir: false,
            is_symlink: false,
        };
        let html = render_listing("/", &[drv]);
        assert!(html.contains("<li><a href=\"drv%FF.groovy\">drv\u{FFFD}.groovy</a></li>"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_entries_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let dir = std::env::temp_dir().join(format!("textserve-listing-raw-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(std::ffi::OsStr::from_bytes(b"drv\xff.groovy")), "x").unwrap();

        let entries = read_entries(&dir).await.unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_name, b"drv\xff.groovy");
        assert_eq!(entries[0].name, "drv\u{FFFD}.groovy");
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = std::env::temp_dir().join(format!("textserve-listing-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("Beta")).unwrap();
        std::fs::write(dir.join("alpha.groovy"), "a").unwrap();
        std::fs::write(dir.join("gamma.json"), "g").unwrap();

        let entries = read_entries(&dir).await.unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(
            entries,
            vec![
                entry("alpha.groovy", false, false),
                entry("Beta", true, false),
                entry("gamma.json", false, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_404() {
        let dir = std::env::temp_dir().join("textserve-listing-never-created");
        assert_eq!(serve_listing(&dir, "/x/", false).await.status(), 404);
    }
}
