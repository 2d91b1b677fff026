//! HTTP cache validation module
//!
//! Provides `Last-Modified` generation and `If-Modified-Since` handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout used by `Last-Modified`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a modification time as an HTTP date, e.g. `Wed, 21 Oct 2015 07:28:00 GMT`
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Parse an HTTP date header value, `None` when it is not a valid date
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Check whether the client's copy is still current
///
/// HTTP dates have one second resolution, so the file time is compared in
/// whole seconds. A missing or unparseable header never matches.
///
/// # Returns
/// Returns true if the file was not modified since the header date (should return 304)
pub fn check_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_http_date() {
        assert_eq!(http_date(at(1_445_412_480)), "Wed, 21 Oct 2015 07:28:00 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let date = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(date.timestamp(), 1_445_412_480);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_check_not_modified() {
        let header = "Wed, 21 Oct 2015 07:28:00 GMT";
        assert!(check_not_modified(Some(header), at(1_445_412_480)));
        assert!(check_not_modified(Some(header), at(1_445_412_000)));
        assert!(!check_not_modified(Some(header), at(1_445_412_481)));
        assert!(!check_not_modified(Some("garbage"), at(0)));
        assert!(!check_not_modified(None, at(0)));
    }

    #[test]
    fn test_subsecond_mtime_is_truncated() {
        let header = "Wed, 21 Oct 2015 07:28:00 GMT";
        let modified = at(1_445_412_480) + Duration::from_millis(750);
        assert!(check_not_modified(Some(header), modified));
    }
}
