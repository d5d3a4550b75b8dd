//! Token model consumed by the sanitizer
//!
//! Any tokenizer can drive the sanitizer as long as it yields these tokens in
//! document order, as `Result<Token, SanitizeError>` items, and stops at end of
//! input. [`crate::tokenizer::HtmlTokenizer`] is the bundled implementation.

/// A single `key="value"` pair on a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tag name plus its attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute::new(key, value));
        self
    }
}

/// Which form of tag a token carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
    SelfClosing,
}

/// A lexed markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(Tag),
    EndTag(Tag),
    SelfClosingTag(Tag),
    /// Text with character references already decoded
    Text(String),
    Comment(String),
    Doctype(String),
}

impl Token {
    /// Split a tag token into its kind and tag
    pub fn into_tag(self) -> Option<(TagKind, Tag)> {
        match self {
            Token::StartTag(tag) => Some((TagKind::Start, tag)),
            Token::EndTag(tag) => Some((TagKind::End, tag)),
            Token::SelfClosingTag(tag) => Some((TagKind::SelfClosing, tag)),
            Token::Text(_) | Token::Comment(_) | Token::Doctype(_) => None,
        }
    }
}
