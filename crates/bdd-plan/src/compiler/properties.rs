//! Node properties declared in comments.
//!
//! A comment of the shape `# key: value` (single-word key and value) above a
//! feature, scenario, outline, background or step sets `key` on that node.
//! Nodes start from their parent's properties, so declarations cascade.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use bdd_plan_gherkin::Comment;
use regex::Regex;

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#+\s*(\S+)\s*:\s*(\S+)\s*$")
        .unwrap_or_else(|_| unreachable!("property regex is valid"))
});

/// `inherited` extended with the properties declared in `comments`.
pub(super) fn properties_from_comments(
    comments: &[Comment],
    inherited: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut properties = inherited.cloned().unwrap_or_default();
    for comment in comments {
        if let Some(caps) = PROPERTY_RE.captures(&comment.text) {
            if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
                properties.insert(key.as_str().to_string(), value.as_str().to_string());
            }
        }
    }
    properties
}
