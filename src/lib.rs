//! striptags - Allow-list HTML Sanitizer
//!
//! This library strips untrusted HTML down to an allow-list of tags and
//! attributes, so user-supplied rich text can be rendered without script
//! injection or unapproved markup.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `tokenizer`: HTML5 tokenization using html5ever
//! - `token`: token model shared by tokenizers and the sanitizer
//! - `rules`: tag and attribute rules plus the built-in defaults
//! - `config`: immutable sanitizer configuration and its builder
//! - `filter`: per-attribute allow/deny decisions
//! - `handler`: live or escaped rendering of individual tags
//! - `escape`: HTML entity escaping
//! - `sanitizer`: the driver tying the pieces together
//! - `charset`: character encoding detection for byte input
//! - `policy`: JSON policy files
//! - `ffi`: C-compatible interface
//!
//! # Examples
//!
//! ```rust
//! let clean = striptags::sanitize(
//!     r#"<div id="c" style="x"><a href="javascript:alert(1)" title="t">hi</a><img src=x onerror=alert(2)></div>"#,
//! )
//! .unwrap();
//! assert_eq!(clean, r#"<div id="c"><a title="t">hi</a><img></div>"#);
//! ```

// Module declarations
pub mod charset;
pub mod config;
pub mod error;
pub mod escape;
pub mod ffi;
pub mod filter;
pub mod handler;
pub mod policy;
pub mod rules;
pub mod sanitizer;
pub mod token;
pub mod tokenizer;

// Re-export main types for convenience
pub use config::{SanitizerConfig, SanitizerConfigBuilder};
pub use error::SanitizeError;
pub use rules::{AttributeRule, RuleSet, TagRule};
pub use sanitizer::{Sanitizer, sanitize};
pub use token::{Attribute, Tag, Token};
