//! Sanitizer configuration
//!
//! [`SanitizerConfig`] is immutable once built. The builder fills any rule
//! mapping the caller did not supply with the built-in defaults; a mapping the
//! caller did supply, even an empty one, is kept exactly as given.
//!
//! # Examples
//!
//! ```rust
//! use striptags::config::SanitizerConfig;
//! use striptags::rules::TagRule;
//!
//! let config = SanitizerConfig::builder()
//!     .escape_invalid_tags(true)
//!     .valid_tags([("p", TagRule::Allowed(true)), ("li", TagRule::Allowed(true))])
//!     .build();
//!
//! assert!(config.escape_invalid_tags);
//! assert!(config.rules.is_valid_tag("p"));
//! assert!(!config.rules.is_valid_tag("div"));
//! // Attribute lists fall back to defaults
//! assert!(config.rules.is_valid_attr("class"));
//! ```

use std::collections::{HashMap, HashSet};

use crate::rules::{
    RuleSet, TagRule, default_disabled_attrs, default_valid_attrs, default_valid_tags,
};

/// Fully-populated sanitizer configuration
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Tag and attribute rules
    pub rules: RuleSet,
    /// Render invalid tags as visible escaped text instead of dropping them
    pub escape_invalid_tags: bool,
    /// Trim whitespace around each text node, eliding empty ones
    pub trim_whitespace: bool,
    /// Drop the text content of dropped raw-text elements such as `script`
    pub drop_raw_text_content: bool,
    /// Reject inputs larger than this many bytes
    pub max_input_size: Option<usize>,
}

impl SanitizerConfig {
    pub fn builder() -> SanitizerConfigBuilder {
        SanitizerConfigBuilder::default()
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`SanitizerConfig`]
///
/// Rule mappings left unset are populated from the built-in defaults in
/// [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SanitizerConfigBuilder {
    valid_tags: Option<HashMap<String, TagRule>>,
    valid_attrs: Option<HashSet<String>>,
    disabled_attrs: Option<HashSet<String>>,
    escape_invalid_tags: bool,
    trim_whitespace: bool,
    drop_raw_text_content: bool,
    max_input_size: Option<usize>,
}

impl Default for SanitizerConfigBuilder {
    fn default() -> Self {
        Self {
            valid_tags: None,
            valid_attrs: None,
            disabled_attrs: None,
            escape_invalid_tags: false,
            trim_whitespace: false,
            drop_raw_text_content: true,
            max_input_size: None,
        }
    }
}

impl SanitizerConfigBuilder {
    /// Replace the valid-tag mapping entirely
    pub fn valid_tags<I, K>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, TagRule)>,
        K: Into<String>,
    {
        self.valid_tags = Some(tags.into_iter().map(|(k, r)| (k.into(), r)).collect());
        self
    }

    /// Replace the tag-agnostic attribute allow-list entirely
    pub fn valid_attrs<I, K>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.valid_attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the tag-agnostic attribute deny-list entirely
    pub fn disabled_attrs<I, K>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.disabled_attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn escape_invalid_tags(mut self, escape: bool) -> Self {
        self.escape_invalid_tags = escape;
        self
    }

    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn drop_raw_text_content(mut self, drop: bool) -> Self {
        self.drop_raw_text_content = drop;
        self
    }

    pub fn max_input_size(mut self, limit: Option<usize>) -> Self {
        self.max_input_size = limit;
        self
    }

    pub fn build(self) -> SanitizerConfig {
        SanitizerConfig {
            rules: RuleSet {
                valid_tags: self.valid_tags.unwrap_or_else(default_valid_tags),
                valid_attrs: self.valid_attrs.unwrap_or_else(default_valid_attrs),
                disabled_attrs: self.disabled_attrs.unwrap_or_else(default_disabled_attrs),
            },
            escape_invalid_tags: self.escape_invalid_tags,
            trim_whitespace: self.trim_whitespace,
            drop_raw_text_content: self.drop_raw_text_content,
            max_input_size: self.max_input_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SanitizerConfig::default();
        assert!(!config.escape_invalid_tags);
        assert!(!config.trim_whitespace);
        assert!(config.drop_raw_text_content);
        assert_eq!(config.max_input_size, None);
        assert!(config.rules.is_valid_tag("a"));
        assert!(config.rules.is_valid_attr("title"));
        assert!(config.rules.is_disabled_attr("onclick"));
    }

    #[test]
    fn test_caller_fields_are_not_overwritten() {
        let config = SanitizerConfig::builder()
            .valid_attrs(["data-id"])
            .disabled_attrs(Vec::<String>::new())
            .build();

        assert!(config.rules.is_valid_attr("data-id"));
        assert!(!config.rules.is_valid_attr("title"));
        // Explicitly empty stays empty
        assert!(config.rules.disabled_attrs.is_empty());
        // Untouched field gets defaults
        assert!(config.rules.is_valid_tag("p"));
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = SanitizerConfig::builder().trim_whitespace(true);
        let first = builder.clone().build();
        let second = builder.build();
        assert_eq!(first.rules.valid_tags.len(), second.rules.valid_tags.len());
        assert_eq!(first.trim_whitespace, second.trim_whitespace);
    }

    #[test]
    fn test_config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SanitizerConfig>();
    }
}
