//! Declarative sanitizer policies
//!
//! A policy is a JSON document describing a [`SanitizerConfig`]. Every field
//! is optional; rule mappings left out fall back to the built-in defaults.
//! Attribute predicates are expressed as value conditions instead of code.
//!
//! ```json
//! {
//!   "escape_invalid_tags": true,
//!   "valid_tags": {
//!     "p": true,
//!     "a": { "href": { "deny_prefix": ["javascript:", "data:"], "ignore_case": true } }
//!   },
//!   "disabled_attrs": ["onclick", "onerror", "onload"]
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use striptags::policy::Policy;
//!
//! let config = Policy::from_json(r#"{ "valid_tags": { "a": { "href": { "deny_pattern": "(?i)^\\s*javascript:" } } } }"#)
//!     .and_then(Policy::into_config)
//!     .unwrap();
//! let rule = config.rules.tag_rule("a").and_then(|r| r.attribute_rule("href")).unwrap();
//! assert!(!rule.keeps(" JavaScript:alert(1)"));
//! assert!(rule.keeps("/home"));
//! ```

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::config::SanitizerConfig;
use crate::error::SanitizeError;
use crate::rules::{AttributeRule, TagRule};

/// Top-level policy document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub escape_invalid_tags: Option<bool>,
    pub trim_whitespace: Option<bool>,
    pub drop_raw_text_content: Option<bool>,
    pub max_input_size: Option<usize>,
    pub valid_tags: Option<HashMap<String, TagRuleSpec>>,
    pub valid_attrs: Option<Vec<String>>,
    pub disabled_attrs: Option<Vec<String>>,
}

/// `true`/`false`, or a map of per-attribute rules
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagRuleSpec {
    Allowed(bool),
    Attributes(HashMap<String, AttributeRuleSpec>),
}

/// `true`/`false`, or a condition that rejects matching values
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeRuleSpec {
    Allowed(bool),
    Condition(ValueCondition),
}

/// Rejects a value if any listed prefix or the pattern matches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueCondition {
    #[serde(default)]
    pub deny_prefix: Vec<String>,
    #[serde(default)]
    pub deny_pattern: Option<String>,
    /// Compare prefixes case-insensitively
    #[serde(default)]
    pub ignore_case: bool,
}

impl Policy {
    pub fn from_json(json: &str) -> Result<Self, SanitizeError> {
        serde_json::from_str(json).map_err(|e| SanitizeError::Config(format!("Invalid policy: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SanitizeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SanitizeError::Config(format!("Failed to read policy {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Compile the policy into a configuration
    ///
    /// # Errors
    ///
    /// - `SanitizeError::Config` if a `deny_pattern` is not a valid regex
    pub fn into_config(self) -> Result<SanitizerConfig, SanitizeError> {
        let mut builder = SanitizerConfig::builder()
            .escape_invalid_tags(self.escape_invalid_tags.unwrap_or(false))
            .trim_whitespace(self.trim_whitespace.unwrap_or(false))
            .drop_raw_text_content(self.drop_raw_text_content.unwrap_or(true))
            .max_input_size(self.max_input_size);

        if let Some(tags) = self.valid_tags {
            let tags = tags
                .into_iter()
                .map(|(name, spec)| spec.into_rule().map(|rule| (name, rule)))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.valid_tags(tags);
        }
        if let Some(attrs) = self.valid_attrs {
            builder = builder.valid_attrs(attrs);
        }
        if let Some(attrs) = self.disabled_attrs {
            builder = builder.disabled_attrs(attrs);
        }

        Ok(builder.build())
    }
}

impl TagRuleSpec {
    fn into_rule(self) -> Result<TagRule, SanitizeError> {
        match self {
            TagRuleSpec::Allowed(allowed) => Ok(TagRule::Allowed(allowed)),
            TagRuleSpec::Attributes(attrs) => {
                let attrs = attrs
                    .into_iter()
                    .map(|(key, spec)| spec.into_rule().map(|rule| (key, rule)))
                    .collect::<Result<HashMap<_, _>, _>>()?;
                Ok(TagRule::AllowedWithAttrs(attrs))
            }
        }
    }
}

impl AttributeRuleSpec {
    fn into_rule(self) -> Result<AttributeRule, SanitizeError> {
        match self {
            AttributeRuleSpec::Allowed(allowed) => Ok(AttributeRule::from(allowed)),
            AttributeRuleSpec::Condition(condition) => condition.into_rule(),
        }
    }
}

impl ValueCondition {
    fn into_rule(self) -> Result<AttributeRule, SanitizeError> {
        let pattern = self
            .deny_pattern
            .map(|p| {
                Regex::new(&p)
                    .map_err(|e| SanitizeError::Config(format!("Invalid deny_pattern '{p}': {e}")))
            })
            .transpose()?;
        let ignore_case = self.ignore_case;
        let prefixes: Vec<String> = if ignore_case {
            self.deny_prefix.iter().map(|p| p.to_lowercase()).collect()
        } else {
            self.deny_prefix
        };

        Ok(AttributeRule::deny_if(move |value| {
            let prefixed = if ignore_case {
                let lower = value.to_lowercase();
                prefixes.iter().any(|p| lower.starts_with(p.as_str()))
            } else {
                prefixes.iter().any(|p| value.starts_with(p.as_str()))
            };
            prefixed || pattern.as_ref().is_some_and(|re| re.is_match(value))
        }))
    }
}
