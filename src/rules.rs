//! Tag and attribute rules
//!
//! A [`RuleSet`] holds the three mappings every sanitizing decision is made
//! against:
//!
//! - `valid_tags`: tags that may be emitted as live markup, each with a
//!   [`TagRule`] that may carry per-attribute rules
//! - `valid_attrs`: tag-agnostic attribute allow-list
//! - `disabled_attrs`: tag-agnostic attribute deny-list, checked first
//!
//! # Threat Model
//!
//! Everything not explicitly allowed is denied. A tag missing from
//! `valid_tags` never reaches the output as markup, and an attribute with no
//! applicable rule is dropped.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Tags allowed by the built-in rule set, besides `a`
const DEFAULT_TAGS: &[&str] = &[
    "abbr",
    "address",
    "article",
    "audio",
    "b",
    "blockquote",
    "br",
    "button",
    "caption",
    "code",
    "cite",
    "div",
    "dl",
    "dt",
    "dd",
    "del",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "i",
    "kbd",
    "li",
    "ol",
    "p",
    "pre",
    "small",
    "span",
    "strong",
    "sub",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "th",
    "td",
    "time",
    "u",
    "ul",
    "video",
    "img",
];

/// Cosmetic attributes allowed on every valid tag
const DEFAULT_VALID_ATTRS: &[&str] = &[
    "title", "id", "class", "alt", "rel", "valign", "align", "rowspan", "colspan",
];

/// Inline event handlers denied on every tag
const DEFAULT_DISABLED_ATTRS: &[&str] = &["onclick", "onerror"];

/// Predicate over an attribute value; `true` means the value is dangerous
#[derive(Clone)]
pub struct ValuePredicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl ValuePredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Returns `true` if `value` should be rejected
    pub fn rejects(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValuePredicate(..)")
    }
}

/// Rule for a single attribute of a specific tag
#[derive(Debug, Clone)]
pub enum AttributeRule {
    AlwaysAllow,
    AlwaysDeny,
    /// Keep the attribute only if the predicate returns `false` for its value
    ConditionalDeny(ValuePredicate),
}

impl AttributeRule {
    /// Build a [`AttributeRule::ConditionalDeny`] from a closure
    ///
    /// # Examples
    ///
    /// ```
    /// use striptags::rules::AttributeRule;
    ///
    /// let rule = AttributeRule::deny_if(|v| v.starts_with("javascript:"));
    /// assert!(!rule.keeps("javascript:alert(1)"));
    /// assert!(rule.keeps("https://example.com"));
    /// ```
    pub fn deny_if<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        AttributeRule::ConditionalDeny(ValuePredicate::new(predicate))
    }

    /// Whether an attribute carrying `value` survives this rule
    pub fn keeps(&self, value: &str) -> bool {
        match self {
            AttributeRule::AlwaysAllow => true,
            AttributeRule::AlwaysDeny => false,
            AttributeRule::ConditionalDeny(predicate) => !predicate.rejects(value),
        }
    }
}

impl From<bool> for AttributeRule {
    fn from(allow: bool) -> Self {
        if allow {
            AttributeRule::AlwaysAllow
        } else {
            AttributeRule::AlwaysDeny
        }
    }
}

/// Rule for a tag present in the valid-tag mapping
///
/// Presence in the mapping is what allows the tag. `Allowed` carries no
/// per-attribute rules, so only globally valid attributes survive on it.
#[derive(Debug, Clone)]
pub enum TagRule {
    Allowed(bool),
    AllowedWithAttrs(HashMap<String, AttributeRule>),
}

impl TagRule {
    /// Per-attribute rule for `key`, if this tag carries one
    pub fn attribute_rule(&self, key: &str) -> Option<&AttributeRule> {
        match self {
            TagRule::Allowed(_) => None,
            TagRule::AllowedWithAttrs(attrs) => attrs.get(key),
        }
    }

    /// Convenience constructor from `(attribute, rule)` pairs
    pub fn with_attrs<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeRule)>,
        K: Into<String>,
    {
        TagRule::AllowedWithAttrs(attrs.into_iter().map(|(k, r)| (k.into(), r)).collect())
    }
}

impl From<bool> for TagRule {
    fn from(allow: bool) -> Self {
        TagRule::Allowed(allow)
    }
}

/// The three rule mappings consulted by the filter and tag handler
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub valid_tags: HashMap<String, TagRule>,
    pub valid_attrs: HashSet<String>,
    pub disabled_attrs: HashSet<String>,
}

impl RuleSet {
    /// Rule set with every mapping populated from the built-in defaults
    pub fn defaults() -> Self {
        Self {
            valid_tags: default_valid_tags(),
            valid_attrs: default_valid_attrs(),
            disabled_attrs: default_disabled_attrs(),
        }
    }

    /// Look up the rule for `tag_name`; `None` means the tag is invalid
    pub fn tag_rule(&self, tag_name: &str) -> Option<&TagRule> {
        self.valid_tags.get(tag_name)
    }

    pub fn is_valid_tag(&self, tag_name: &str) -> bool {
        self.valid_tags.contains_key(tag_name)
    }

    pub fn is_disabled_attr(&self, key: &str) -> bool {
        self.disabled_attrs.contains(key)
    }

    pub fn is_valid_attr(&self, key: &str) -> bool {
        self.valid_attrs.contains(key)
    }
}

/// Built-in valid tags, including the `javascript:` guard on `a[href]`
pub fn default_valid_tags() -> HashMap<String, TagRule> {
    let mut tags: HashMap<String, TagRule> = DEFAULT_TAGS
        .iter()
        .map(|tag| (tag.to_string(), TagRule::Allowed(true)))
        .collect();
    tags.insert(
        "a".to_string(),
        TagRule::with_attrs([(
            "href",
            AttributeRule::deny_if(|v| v.starts_with("javascript:")),
        )]),
    );
    tags
}

pub fn default_valid_attrs() -> HashSet<String> {
    DEFAULT_VALID_ATTRS.iter().map(|a| a.to_string()).collect()
}

pub fn default_disabled_attrs() -> HashSet<String> {
    DEFAULT_DISABLED_ATTRS.iter().map(|a| a.to_string()).collect()
}
