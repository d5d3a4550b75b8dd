//! HTML entity escaping
//!
//! Converts raw text into entity-escaped text for the six characters
//! `& ' < > " \r`. Used for text nodes, attribute values, and for rendering
//! disallowed tags as inert visible text.
//!
//! # Examples
//!
//! ```rust
//! use striptags::escape::escape;
//!
//! assert_eq!(escape("<script>"), "&lt;script&gt;");
//! assert_eq!(escape("a&b"), "a&amp;b");
//! assert_eq!(escape("plain"), "plain");
//! ```

use std::borrow::Cow;
use std::fmt;

/// Characters that must be replaced by an entity
const ESCAPED_CHARS: [char; 6] = ['&', '\'', '<', '>', '"', '\r'];

fn entity_for(c: char) -> &'static str {
    match c {
        '&' => "&amp;",
        // "&#39;" is shorter than "&apos;", which HTML4 lacks
        '\'' => "&#39;",
        '<' => "&lt;",
        '>' => "&gt;",
        // "&#34;" is shorter than "&quot;"
        '"' => "&#34;",
        _ => "&#13;",
    }
}

/// Write `text` to `out`, escaping special characters
///
/// Literal runs between special characters are written in one call each.
/// The first write failure aborts the scan and is returned; whatever was
/// already written to `out` must be discarded by the caller.
pub fn escape_into<W: fmt::Write + ?Sized>(out: &mut W, text: &str) -> fmt::Result {
    let mut rest = text;
    while let Some(i) = rest.find(ESCAPED_CHARS) {
        out.write_str(&rest[..i])?;
        // All escaped characters are single-byte ASCII
        let c = rest.as_bytes()[i] as char;
        out.write_str(entity_for(c))?;
        rest = &rest[i + 1..];
    }
    out.write_str(rest)
}

/// Escape `text`, borrowing it unchanged when nothing needs replacing
pub fn escape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(ESCAPED_CHARS) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        if ESCAPED_CHARS.contains(&c) {
            out.push_str(entity_for(c));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
