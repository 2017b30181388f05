//! Normalises document tags into plan tag names.

use std::collections::HashSet;

use bdd_plan_gherkin::Tag;

/// Names of `tags` without the leading `@`, in first-seen order and without
/// duplicates.
pub(crate) fn tag_names(tags: &[Tag]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.name.strip_prefix('@').unwrap_or(&tag.name).to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
