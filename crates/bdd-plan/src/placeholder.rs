//! Placeholder substitution for scenario outline steps.
//!
//! `<column>` tokens in step text, data table cells and doc-string content
//! are replaced by the value of the matching examples column. Columns are
//! looked up by name; tokens naming no column stay as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Regex pattern matching `<placeholder>` tokens.
///
/// Captures the placeholder name without the angle brackets, including spaces
/// and punctuation commonly used in examples headers.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^>\s][^>]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

/// One examples row addressed by column name.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Row<'a> {
    header: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    pub(crate) fn new(header: &'a [String], values: &'a [String]) -> Self {
        Self { header, values }
    }

    fn value(&self, column: &str) -> Option<&'a str> {
        let index = self.header.iter().position(|name| name == column)?;
        self.values.get(index).map(String::as_str)
    }

    /// `text` with every known placeholder replaced.
    pub(crate) fn substitute(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures<'_>| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                caps.get(1)
                    .and_then(|name| self.value(name.as_str()))
                    .unwrap_or(whole)
                    .to_string()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case("I have <count> <item>", "I have 5 apples")]
    #[case("<item> costs <price>", "apples costs <price>")]
    #[case("<count><count>", "55")]
    #[case("no placeholders", "no placeholders")]
    #[case("spaced <unit price>", "spaced 1.20")]
    #[case("not a < placeholder>", "not a < placeholder>")]
    fn substitutes_by_column_name(#[case] text: &str, #[case] expected: &str) {
        let header = strings(&["item", "count", "unit price"]);
        let values = strings(&["apples", "5", "1.20"]);
        assert_eq!(Row::new(&header, &values).substitute(text), expected);
    }

    #[test]
    fn values_are_not_substituted_again() {
        let header = strings(&["a", "b"]);
        let values = strings(&["<b>", "x"]);
        assert_eq!(Row::new(&header, &values).substitute("<a>"), "<b>");
    }
}
