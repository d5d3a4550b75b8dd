//! Attribute filtering
//!
//! Each attribute is judged on its own, in source order, and the first
//! matching tier decides:
//!
//! 1. key in `disabled_attrs` → dropped, whatever the tag rules say
//! 2. key in `valid_attrs` → kept
//! 3. the tag's own [`AttributeRule`] for the key, if it has one
//! 4. otherwise → dropped
//!
//! Kept attributes retain their relative order.

use crate::rules::RuleSet;
use crate::token::Attribute;

/// Decide whether one attribute of `tag_name` survives
pub fn attribute_allowed(rules: &RuleSet, tag_name: &str, attr: &Attribute) -> bool {
    if rules.is_disabled_attr(&attr.key) {
        return false;
    }
    if rules.is_valid_attr(&attr.key) {
        return true;
    }
    rules
        .tag_rule(tag_name)
        .and_then(|rule| rule.attribute_rule(&attr.key))
        .is_some_and(|rule| rule.keeps(&attr.value))
}

/// Filter `attrs` of `tag_name`, keeping only allowed attributes
///
/// # Examples
///
/// ```
/// use striptags::filter::filter_attributes;
/// use striptags::rules::RuleSet;
/// use striptags::token::Attribute;
///
/// let rules = RuleSet::defaults();
/// let attrs = vec![
///     Attribute::new("href", "javascript:alert(1)"),
///     Attribute::new("title", "x"),
///     Attribute::new("onclick", "steal()"),
/// ];
/// let kept = filter_attributes(&rules, "a", attrs);
/// assert_eq!(kept, vec![Attribute::new("title", "x")]);
/// ```
pub fn filter_attributes(rules: &RuleSet, tag_name: &str, attrs: Vec<Attribute>) -> Vec<Attribute> {
    if attrs.is_empty() {
        return attrs;
    }

    attrs
        .into_iter()
        .filter(|attr| {
            let keep = attribute_allowed(rules, tag_name, attr);
            if !keep {
                tracing::trace!(tag = tag_name, attr = %attr.key, "Dropping attribute");
            }
            keep
        })
        .collect()
}
