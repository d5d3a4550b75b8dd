//! Sanitizing driver
//!
//! Drives a token stream through the tag handler and text policy into an
//! output sink, in one forward pass.
//!
//! # Examples
//!
//! ```rust
//! use striptags::{Sanitizer, SanitizerConfig};
//!
//! let sanitizer = Sanitizer::new();
//! let clean = sanitizer
//!     .sanitize(r#"<p onclick="x()">hello</p><script>alert(1)</script>"#)
//!     .unwrap();
//! assert_eq!(clean, "<p>hello</p>");
//!
//! let escaping = Sanitizer::with_config(
//!     SanitizerConfig::builder().escape_invalid_tags(true).build(),
//! );
//! assert_eq!(
//!     escaping.sanitize("<p>hello</p><script>alert(1)</script>").unwrap(),
//!     "<p>hello</p>&lt;script&gt;alert(1)&lt;/script&gt;"
//! );
//! ```
//!
//! # Thread Safety
//!
//! A [`Sanitizer`] shares its configuration through an [`Arc`]; clone it
//! freely across threads. Every call owns its own output buffer.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use crate::charset::decode_html;
use crate::config::SanitizerConfig;
use crate::error::SanitizeError;
use crate::escape::escape_into;
use crate::handler::{TagAction, handle_tag};
use crate::token::{TagKind, Token};
use crate::tokenizer::{HtmlTokenizer, is_raw_text_element};

/// Sanitize `html` with the process-wide default configuration
pub fn sanitize(html: &str) -> Result<String, SanitizeError> {
    static DEFAULT: OnceLock<Sanitizer> = OnceLock::new();
    DEFAULT.get_or_init(Sanitizer::new).sanitize(html)
}

/// HTML sanitizer bound to one immutable configuration
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: Arc<SanitizerConfig>,
}

impl Sanitizer {
    /// Sanitizer with the built-in default rules
    pub fn new() -> Self {
        Self::with_config(SanitizerConfig::default())
    }

    pub fn with_config(config: SanitizerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Sanitizer sharing an existing configuration
    pub fn with_shared_config(config: Arc<SanitizerConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitize a document into a new string
    ///
    /// # Errors
    ///
    /// - `SanitizeError::InputTooLarge` if `max_input_size` is exceeded
    pub fn sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        let mut out = String::with_capacity(html.len());
        self.sanitize_to(html, &mut out)?;
        tracing::debug!(output_len = out.len(), "Sanitized document");
        Ok(out)
    }

    /// Sanitize a document into a caller-provided sink
    ///
    /// On error the sink contents are unspecified and should be discarded.
    pub fn sanitize_to<W: Write + ?Sized>(&self, html: &str, out: &mut W) -> Result<(), SanitizeError> {
        self.check_size(html.len())?;
        self.sanitize_unchecked(html, out)
    }

    /// Sanitize raw bytes, detecting their charset first
    ///
    /// `content_type` is the optional Content-Type header value; see
    /// [`crate::charset`] for the detection cascade.
    pub fn sanitize_bytes(
        &self,
        html: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, SanitizeError> {
        self.check_size(html.len())?;
        let decoded = decode_html(html, content_type)?;
        // The cap applies to the caller's bytes, not the transcoded text
        let mut out = String::with_capacity(decoded.len());
        self.sanitize_unchecked(&decoded, &mut out)?;
        Ok(out)
    }

    /// Drive an arbitrary token stream into `out`
    ///
    /// The stream ends at the first `None`; the first `Err` aborts the call
    /// and is returned unchanged.
    pub fn sanitize_tokens<I, W>(&self, tokens: I, out: &mut W) -> Result<(), SanitizeError>
    where
        I: IntoIterator<Item = Result<Token, SanitizeError>>,
        W: Write + ?Sized,
    {
        let config = &*self.config;
        // Name of a dropped raw-text element whose content is being skipped
        let mut skipping: Option<String> = None;

        for token in tokens {
            let token = token.inspect_err(|e| {
                tracing::debug!(error = %e, "Token source failed");
            })?;

            match token {
                Token::Text(text) => {
                    if skipping.is_some() {
                        continue;
                    }
                    write_text(config, &text, out)?;
                }
                Token::Comment(_) | Token::Doctype(_) => {}
                tag_token => {
                    let Some((kind, tag)) = tag_token.into_tag() else {
                        continue;
                    };
                    // Any tag ends a skip; token sources other than html5ever
                    // may never send the matching end tag
                    if let Some(skipped) = skipping.take() {
                        tracing::trace!(tag = %skipped, "Raw-text content skipped");
                    }

                    let raw_text = kind != TagKind::End && is_raw_text_element(&tag.name);
                    let name = raw_text.then(|| tag.name.clone());
                    let action = handle_tag(config, kind, tag, out)?;
                    if action == TagAction::Dropped && config.drop_raw_text_content {
                        skipping = name;
                    }
                }
            }
        }
        Ok(())
    }

    fn sanitize_unchecked<W: Write + ?Sized>(&self, html: &str, out: &mut W) -> Result<(), SanitizeError> {
        tracing::debug!(input_len = html.len(), "Sanitizing document");
        self.sanitize_tokens(HtmlTokenizer::new(html.trim()), out)
    }

    fn check_size(&self, size: usize) -> Result<(), SanitizeError> {
        match self.config.max_input_size {
            Some(limit) if size > limit => {
                tracing::warn!(size, limit, "Rejecting oversized input");
                Err(SanitizeError::InputTooLarge { size, limit })
            }
            _ => Ok(()),
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit a text node under the whitespace policy
///
/// Text arrives with character references decoded, so it is re-escaped to
/// keep decoded `<` and `&` inert.
fn write_text<W: Write + ?Sized>(
    config: &SanitizerConfig,
    text: &str,
    out: &mut W,
) -> Result<(), SanitizeError> {
    let text = if config.trim_whitespace { text.trim() } else { text };
    if text.is_empty() {
        return Ok(());
    }
    escape_into(out, text)?;
    Ok(())
}
