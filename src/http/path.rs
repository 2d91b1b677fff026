//! Request path resolution module
//!
//! Turns a request path into a filesystem path under the served root. `..`
//! segments are resolved lexically and can never climb above the root; the
//! final canonical path is checked again so that symlinks cannot escape it.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of resolving a request path on disk
#[derive(Debug)]
pub enum Resolved {
    /// Canonical path inside the root
    Inside(PathBuf),
    /// Path exists but its canonical form is outside the root
    Outside(PathBuf),
    /// Canonicalization failed (usually: not found)
    Missing(io::Error),
}

/// Decode `%XX` escapes into raw bytes. Returns `None` for malformed escapes.
///
/// The output is not required to be UTF-8: file names on unix are arbitrary bytes.
pub fn percent_decode(input: &str) -> Option<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value)?;
            let lo = bytes.get(i + 2).copied().and_then(hex_value)?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a path for use in an `href`, leaving unreserved characters and `/` as is
pub fn percent_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Join a decoded request path onto `root` without ever leaving it lexically
///
/// Empty and `.` segments are skipped, `..` drops the previous segment (and is
/// ignored at the root), segments carrying a backslash or NUL are discarded.
pub fn join_under_root(root: &Path, decoded: &[u8]) -> PathBuf {
    let mut segments: Vec<&[u8]> = Vec::new();
    for segment in decoded.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                segments.pop();
            }
            s if s.contains(&b'\\') || s.contains(&0) => {}
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments.into_iter().map(os_from_bytes));
    path
}

/// Raw bytes of a file name
#[cfg(unix)]
pub fn os_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
pub fn os_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// File name from raw bytes, the inverse of [`os_bytes`]
#[cfg(unix)]
pub fn os_from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_os_string()
}

// Non-UTF-8 names cannot exist here, the lossy name simply misses on disk
#[cfg(not(unix))]
pub fn os_from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Canonicalize `candidate` and check that it stays under `root` (already canonical)
pub fn resolve(root: &Path, candidate: &Path) -> Resolved {
    match candidate.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Resolved::Inside(canonical),
        Ok(canonical) => Resolved::Outside(canonical),
        Err(e) => Resolved::Missing(e),
    }
}
