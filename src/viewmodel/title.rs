//! Display titles for resources

use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute keys consulted for a resource title, highest priority first
pub const TITLE_KEYS: &[&str] = &["title", "name", "question", "choice"];

/// First string-valued attribute among `priority_keys`.
///
/// Keys whose value is not a string are skipped rather than converted, so
/// `{"title": 3, "name": "x"}` yields `"x"`.
pub fn infer_title<'a>(
    attributes: &'a BTreeMap<String, Value>,
    priority_keys: &[&str],
) -> Option<&'a str> {
    priority_keys
        .iter()
        .find_map(|key| attributes.get(*key).and_then(|v| v.as_str()))
}
