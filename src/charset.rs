//! Character encoding detection and decoding for byte input
//!
//! # Detection Cascade
//!
//! 1. **Content-Type Header**: `charset` parameter of the header value
//! 2. **HTML Meta Tags**: `<meta charset>` or `<meta http-equiv="Content-Type">`
//!    within the first 1024 bytes
//! 3. **Default**: UTF-8
//!
//! # Examples
//!
//! ```rust
//! use striptags::charset::{decode_html, detect_charset};
//!
//! assert_eq!(detect_charset(Some("text/html; charset=ISO-8859-1"), b"<p>"), "ISO-8859-1");
//! assert_eq!(detect_charset(None, b"<meta charset=\"utf-8\">"), "UTF-8");
//! assert_eq!(detect_charset(None, b"<p>plain</p>"), "UTF-8");
//!
//! let text = decode_html(b"caf\xE9", Some("text/html; charset=windows-1252")).unwrap();
//! assert_eq!(text, "café");
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SanitizeError;

/// Charset used when neither header nor markup declares one
const DEFAULT_CHARSET: &str = "UTF-8";

/// Meta declarations must appear within this many leading bytes
const META_SCAN_LIMIT: usize = 1024;

fn content_type_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()
}

fn meta_charset_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*["']?([^"';>\s]+)"#).ok())
        .as_ref()
}

fn meta_http_equiv_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| {
            Regex::new(
                r#"(?i)<meta\s+http-equiv\s*=\s*["']?Content-Type["']?\s+content\s*=\s*["']?[^"'>]*charset\s*=\s*([^"';>\s]+)"#,
            )
            .ok()
        })
        .as_ref()
}

/// Detect the charset of `html`, normalized to upper case
pub fn detect_charset(content_type: Option<&str>, html: &[u8]) -> String {
    content_type
        .and_then(charset_from_content_type)
        .or_else(|| charset_from_meta(html))
        .map(|charset| charset.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// Extract the `charset` parameter of a Content-Type header value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type_regex()?
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a charset declared by a `<meta>` tag near the top of `html`
pub fn charset_from_meta(html: &[u8]) -> Option<String> {
    let prefix = &html[..html.len().min(META_SCAN_LIMIT)];
    // Lossy is fine: declarations are ASCII
    let prefix = String::from_utf8_lossy(prefix);

    [meta_charset_regex(), meta_http_equiv_regex()]
        .into_iter()
        .flatten()
        .find_map(|regex| {
            regex
                .captures(&prefix)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
}

/// Decode `html` to UTF-8 using the detected charset
///
/// UTF-8 input is borrowed without copying. Bytes that are invalid for the
/// detected charset, or an unknown charset label, yield
/// [`SanitizeError::Encoding`].
pub fn decode_html<'a>(
    html: &'a [u8],
    content_type: Option<&str>,
) -> Result<Cow<'a, str>, SanitizeError> {
    let charset = detect_charset(content_type, html);

    if charset.eq_ignore_ascii_case("UTF-8") || charset.eq_ignore_ascii_case("UTF8") {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            SanitizeError::Encoding(format!(
                "Invalid UTF-8 at byte position {}: {}",
                e.valid_up_to(),
                e
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        SanitizeError::Encoding(format!("Unsupported charset '{charset}'"))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            SanitizeError::Encoding(format!("Invalid byte sequence for charset '{charset}'"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_content_type_variants() {
        for header in [
            "text/html; charset=UTF-8",
            "text/html; charset=\"UTF-8\"",
            "text/html;charset=UTF-8",
            "text/html; CHARSET=UTF-8; boundary=x",
        ] {
            assert_eq!(charset_from_content_type(header), Some("UTF-8".to_string()));
        }
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type(""), None);
    }

    #[test]
    fn test_meta_variants() {
        assert_eq!(
            charset_from_meta(b"<head><meta charset=\"utf-8\"></head>"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            charset_from_meta(b"<META CHARSET=latin1>"),
            Some("latin1".to_string())
        );
        assert_eq!(
            charset_from_meta(
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\">"
            ),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_from_meta(b"<title>none</title>"), None);
    }

    #[test]
    fn test_meta_beyond_scan_limit_ignored() {
        let mut html = vec![b' '; META_SCAN_LIMIT + 10];
        html.extend_from_slice(b"<meta charset=\"ISO-8859-1\">");
        assert_eq!(charset_from_meta(&html), None);
    }

    #[test]
    fn test_header_beats_meta() {
        let html = b"<meta charset=\"ISO-8859-1\">";
        assert_eq!(detect_charset(Some("text/html; charset=utf-8"), html), "UTF-8");
        assert_eq!(detect_charset(Some("text/html"), html), "ISO-8859-1");
    }

    #[test]
    fn test_decode_utf8_borrows() {
        let decoded = decode_html("✓ ok".as_bytes(), None).unwrap();
        assert!(matches!(decoded, Cow::Borrowed("✓ ok")));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_html(b"abc\xFF", None).unwrap_err();
        assert!(matches!(err, SanitizeError::Encoding(_)));
    }

    #[test]
    fn test_decode_legacy_charset() {
        let decoded = decode_html(b"<meta charset=\"iso-8859-1\">\xE9t\xE9", None).unwrap();
        assert!(decoded.ends_with("été"));
    }

    #[test]
    fn test_decode_unknown_charset() {
        let err = decode_html(b"x", Some("text/html; charset=klingon")).unwrap_err();
        assert!(err.to_string().contains("Unsupported charset"));
    }

    proptest! {
        #[test]
        fn prop_header_has_priority(
            header in prop::sample::select(vec!["utf-8", "iso-8859-1", "windows-1252", "shift_jis"]),
            meta in prop::sample::select(vec!["UTF-8", "ISO-8859-1", "WINDOWS-1252", "SHIFT_JIS"]),
        ) {
            let content_type = format!("text/html; charset={header}");
            let html = format!(r#"<meta charset="{meta}">"#);
            prop_assert_eq!(detect_charset(Some(&content_type), html.as_bytes()), header.to_uppercase());
        }
    }
}
