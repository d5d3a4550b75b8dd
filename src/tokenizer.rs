//! HTML tokenization using html5ever
//!
//! This module adapts html5ever's standalone tokenizer (no tree builder) into
//! the crate's [`Token`] stream.
//!
//! # Behaviour
//!
//! - **Malformed markup**: html5ever recovers from every syntax error, so
//!   tokenizing a `&str` never fails; recoverable errors are logged at trace
//!   level and skipped
//! - **Names**: tag and attribute names are lower-cased by the tokenizer
//! - **Character references**: decoded in text and attribute values
//! - **Text coalescing**: adjacent character runs are merged so each text node
//!   reaches the sanitizer as one token
//! - **Raw-text elements**: after a `script`, `style`, `title`, ... start tag
//!   the tokenizer reads the content as text up to the matching end tag, the
//!   way a tree builder would instruct it to
//!
//! # Examples
//!
//! ```rust
//! use striptags::token::{Tag, Token};
//! use striptags::tokenizer::tokenize;
//!
//! let tokens = tokenize("<p class=x>a &amp; b</p>");
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::StartTag(Tag::new("p").with_attr("class", "x")),
//!         Token::Text("a & b".to_string()),
//!         Token::EndTag(Tag::new("p")),
//!     ]
//! );
//! ```

use std::cell::RefCell;
use std::vec;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::TokenizerResult;
use html5ever::tokenizer::{
    BufferQueue, Tag as HtmlTag, TagKind as HtmlTagKind, Token as HtmlToken, TokenSink,
    TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::error::SanitizeError;
use crate::token::{Attribute, Tag, Token};

/// Elements whose content is lexed as raw text rather than markup
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "textarea",
    "title",
    "xmp",
];

pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

/// Tokenizer state to switch to after `tag`
fn next_state(tag: &HtmlTag) -> TokenSinkResult<()> {
    if tag.kind != HtmlTagKind::StartTag {
        return TokenSinkResult::Continue;
    }
    match &*tag.name {
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

fn convert_tag(tag: HtmlTag) -> Token {
    let converted = Tag {
        name: tag.name.to_string(),
        attrs: tag
            .attrs
            .into_iter()
            .map(|attr| Attribute::new(attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
    };
    match (tag.kind, tag.self_closing) {
        (HtmlTagKind::EndTag, _) => Token::EndTag(converted),
        (HtmlTagKind::StartTag, true) => Token::SelfClosingTag(converted),
        (HtmlTagKind::StartTag, false) => Token::StartTag(converted),
    }
}

/// Token sink collecting converted tokens
#[derive(Default)]
struct CollectingSink {
    tokens: RefCell<Vec<Token>>,
    pending_text: RefCell<String>,
}

impl CollectingSink {
    fn flush_text(&self) {
        let mut pending = self.pending_text.borrow_mut();
        if !pending.is_empty() {
            self.tokens
                .borrow_mut()
                .push(Token::Text(std::mem::take(&mut *pending)));
        }
    }

    fn push(&self, token: Token) {
        self.flush_text();
        self.tokens.borrow_mut().push(token);
    }
}

impl TokenSink for CollectingSink {
    type Handle = ();

    fn process_token(&self, token: HtmlToken, line_number: u64) -> TokenSinkResult<()> {
        match token {
            HtmlToken::CharacterTokens(text) => self.pending_text.borrow_mut().push_str(&text),
            HtmlToken::TagToken(tag) => {
                let state = next_state(&tag);
                self.push(convert_tag(tag));
                return state;
            }
            HtmlToken::CommentToken(text) => self.push(Token::Comment(text.to_string())),
            HtmlToken::DoctypeToken(doctype) => self.push(Token::Doctype(
                doctype.name.map(|n| n.to_string()).unwrap_or_default(),
            )),
            HtmlToken::ParseError(error) => {
                tracing::trace!(line = line_number, error = %error, "Recoverable tokenizer error");
            }
            HtmlToken::EOFToken => self.flush_text(),
            // NUL characters are dropped
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize a whole document into crate tokens
pub fn tokenize(html: &str) -> Vec<Token> {
    let tokenizer = Tokenizer::new(CollectingSink::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    // The sink never requests script execution, so one feed consumes everything
    match tokenizer.feed(&input) {
        TokenizerResult::Done => {}
        TokenizerResult::Script(()) => {
            debug_assert!(false, "token sink requested script execution");
            tracing::warn!("Tokenizer paused for script; remaining input dropped");
        }
    }
    tokenizer.end();

    tokenizer.sink.flush_text();
    tokenizer.sink.tokens.take()
}

/// Token source over an in-memory document
///
/// Yields `Result` items so it plugs into
/// [`Sanitizer::sanitize_tokens`](crate::sanitizer::Sanitizer::sanitize_tokens)
/// alongside fallible token sources.
#[derive(Debug)]
pub struct HtmlTokenizer {
    tokens: vec::IntoIter<Token>,
}

impl HtmlTokenizer {
    pub fn new(html: &str) -> Self {
        Self {
            tokens: tokenize(html).into_iter(),
        }
    }
}

impl Iterator for HtmlTokenizer {
    type Item = Result<Token, SanitizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens = tokenize(r#"<a title="t" HREF='u'>link</a><br/>"#);
        assert_eq!(
            tokens,
            vec![
                Token::StartTag(Tag::new("a").with_attr("title", "t").with_attr("href", "u")),
                Token::Text("link".to_string()),
                Token::EndTag(Tag::new("a")),
                Token::SelfClosingTag(Tag::new("br")),
            ]
        );
    }

    #[test]
    fn test_tag_names_lowercased() {
        assert_eq!(tokenize("<DIV>"), vec![Token::StartTag(Tag::new("div"))]);
    }

    #[test]
    fn test_comments_and_doctype() {
        let tokens = tokenize("<!doctype html><!-- note --><p>");
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("html".to_string()),
                Token::Comment(" note ".to_string()),
                Token::StartTag(Tag::new("p")),
            ]
        );
    }

    #[test]
    fn test_text_runs_are_coalesced() {
        let tokens = tokenize("  a &amp; b &lt;c&gt;  ");
        assert_eq!(tokens, vec![Token::Text("  a & b <c>  ".to_string())]);
    }

    #[test]
    fn test_script_content_is_raw_text() {
        let tokens = tokenize("<script>if (a < b) { x = '<p>'; }</script><p>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag(Tag::new("script")),
                Token::Text("if (a < b) { x = '<p>'; }".to_string()),
                Token::EndTag(Tag::new("script")),
                Token::StartTag(Tag::new("p")),
            ]
        );
    }

    #[test]
    fn test_single_feed_consumes_scripts_and_trailing_markup() {
        let tokens = tokenize("<script>a()</script><script src=x></script><b>end</b>");
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens.last(), Some(&Token::EndTag(Tag::new("b"))));
    }

    #[test]
    fn test_title_content_decodes_references() {
        let tokens = tokenize("<title>a &amp; <b></title>");
        assert_eq!(tokens[1], Token::Text("a & <b>".to_string()));
    }

    #[test]
    fn test_nul_characters_dropped() {
        assert_eq!(tokenize("a\0b"), vec![Token::Text("ab".to_string())]);
    }

    #[test]
    fn test_malformed_markup_yields_tokens() {
        let tokens = tokenize("<p <div>text</p");
        assert!(!tokens.is_empty());
    }

    #[test]
    fn test_iterator_yields_ok_items() {
        let items: Vec<_> = HtmlTokenizer::new("<p>x</p>").collect();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(Result::is_ok));
    }

    #[test]
    fn test_raw_text_elements() {
        assert!(is_raw_text_element("script"));
        assert!(is_raw_text_element("style"));
        assert!(!is_raw_text_element("p"));
    }
}
