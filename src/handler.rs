//! Tag handling
//!
//! A tag present in the valid-tag mapping is written back as live markup
//! after attribute filtering. Any other tag is either dropped or, with
//! `escape_invalid_tags`, rendered as inert visible text that mirrors the
//! original syntax, e.g. `<script src="x">` becomes
//! `&lt;script src="x"&gt;`.

use std::fmt::Write;

use crate::config::SanitizerConfig;
use crate::escape::escape_into;
use crate::filter::filter_attributes;
use crate::token::{Attribute, Tag, TagKind};

/// Outcome of handling one tag token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    /// Written as live markup
    Emitted,
    /// Written as escaped text
    Escaped,
    /// Nothing written
    Dropped,
}

/// Handle a single tag token, writing its sanitized form to `out`
pub fn handle_tag<W: Write + ?Sized>(
    config: &SanitizerConfig,
    kind: TagKind,
    tag: Tag,
    out: &mut W,
) -> Result<TagAction, std::fmt::Error> {
    if config.rules.is_valid_tag(&tag.name) {
        let attrs = filter_attributes(&config.rules, &tag.name, tag.attrs);
        write_live_tag(out, kind, &tag.name, &attrs)?;
        return Ok(TagAction::Emitted);
    }

    if !config.escape_invalid_tags {
        tracing::debug!(tag = %tag.name, "Dropping invalid tag");
        return Ok(TagAction::Dropped);
    }

    tracing::debug!(tag = %tag.name, "Escaping invalid tag");
    write_escaped_tag(out, kind, &tag)?;
    Ok(TagAction::Escaped)
}

fn write_attrs<W: Write + ?Sized>(out: &mut W, attrs: &[Attribute]) -> std::fmt::Result {
    for attr in attrs {
        out.write_char(' ')?;
        out.write_str(&attr.key)?;
        out.write_str("=\"")?;
        escape_into(out, &attr.value)?;
        out.write_char('"')?;
    }
    Ok(())
}

/// Serialize a tag as markup: `<p>`, `</p>`, `<br/>`
fn write_live_tag<W: Write + ?Sized>(
    out: &mut W,
    kind: TagKind,
    name: &str,
    attrs: &[Attribute],
) -> std::fmt::Result {
    out.write_str(if kind == TagKind::End { "</" } else { "<" })?;
    out.write_str(name)?;
    write_attrs(out, attrs)?;
    out.write_str(if kind == TagKind::SelfClosing { "/>" } else { ">" })
}

/// Render a tag as text. Attributes are shown unfiltered since the result is
/// inert; names and keys are escaped because tokenizers admit `<` and quotes
/// in them.
fn write_escaped_tag<W: Write + ?Sized>(out: &mut W, kind: TagKind, tag: &Tag) -> std::fmt::Result {
    out.write_str("&lt;")?;
    if kind == TagKind::End {
        out.write_char('/')?;
    }
    escape_into(out, &tag.name)?;
    for attr in &tag.attrs {
        out.write_char(' ')?;
        escape_into(out, &attr.key)?;
        out.write_str("=\"")?;
        escape_into(out, &attr.value)?;
        out.write_char('"')?;
    }
    if kind == TagKind::SelfClosing {
        out.write_char('/')?;
    }
    out.write_str("&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TagRule;

    fn render(config: &SanitizerConfig, kind: TagKind, tag: Tag) -> (TagAction, String) {
        let mut out = String::new();
        let action = handle_tag(config, kind, tag, &mut out).unwrap();
        (action, out)
    }

    #[test]
    fn test_valid_start_tag() {
        let config = SanitizerConfig::default();
        let tag = Tag::new("div").with_attr("id", "content").with_attr("style", "x");
        assert_eq!(
            render(&config, TagKind::Start, tag),
            (TagAction::Emitted, r#"<div id="content">"#.to_string())
        );
    }

    #[test]
    fn test_valid_end_and_self_closing() {
        let config = SanitizerConfig::default();
        assert_eq!(render(&config, TagKind::End, Tag::new("p")).1, "</p>");
        assert_eq!(
            render(&config, TagKind::SelfClosing, Tag::new("img").with_attr("alt", "a\"b")).1,
            r#"<img alt="a&#34;b"/>"#
        );
    }

    #[test]
    fn test_invalid_tag_dropped() {
        let config = SanitizerConfig::default();
        let tag = Tag::new("script").with_attr("src", "evil.js");
        assert_eq!(render(&config, TagKind::Start, tag), (TagAction::Dropped, String::new()));
    }

    #[test]
    fn test_invalid_tag_escaped_with_raw_attributes() {
        let config = SanitizerConfig::builder().escape_invalid_tags(true).build();
        let tag = Tag::new("hx").with_attr("name", "zhang").with_attr("onclick", "a<b");
        assert_eq!(
            render(&config, TagKind::Start, tag),
            (
                TagAction::Escaped,
                r#"&lt;hx name="zhang" onclick="a&lt;b"&gt;"#.to_string()
            )
        );
    }

    #[test]
    fn test_invalid_end_and_self_closing_escaped() {
        let config = SanitizerConfig::builder().escape_invalid_tags(true).build();
        assert_eq!(render(&config, TagKind::End, Tag::new("script")).1, "&lt;/script&gt;");
        assert_eq!(
            render(&config, TagKind::SelfClosing, Tag::new("index").with_attr("id", "2")).1,
            r#"&lt;index id="2"/&gt;"#
        );
    }

    #[test]
    fn test_escaped_names_cannot_open_markup() {
        let config = SanitizerConfig::builder().escape_invalid_tags(true).build();
        let tag = Tag::new("x<img").with_attr("<svg", "1");
        let (_, out) = render(&config, TagKind::Start, tag);
        assert!(!out.contains('<'));
        assert_eq!(out, r#"&lt;x&lt;img &lt;svg="1"&gt;"#);
    }

    #[test]
    fn test_tag_present_with_false_is_still_emitted() {
        let config = SanitizerConfig::builder()
            .valid_tags([("li", TagRule::Allowed(false))])
            .build();
        let tag = Tag::new("li").with_attr("active", "active");
        assert_eq!(render(&config, TagKind::Start, tag).1, "<li>");
    }

    #[test]
    fn test_lookup_is_exact() {
        let config = SanitizerConfig::default();
        assert_eq!(render(&config, TagKind::Start, Tag::new("P")).0, TagAction::Dropped);
    }
}
