//! Abstract syntax tree and evaluation helpers for tag expressions.
//!
//! Tag expressions recognise tags (`@tag`), unary `not`, binary `and` and `or`,
//! and parentheses for grouping, for example `@fast and (not @wip or @nightly)`.
//!
//! Precedence follows Gherkin conventions: `not` binds tighter than `and`,
//! which in turn binds tighter than `or`. Operators associate to the left, so
//! `@a or @b and @c` is parsed as `@a or (@b and @c)`.
//!
//! Evaluation takes tag names without the leading `@` and short-circuits.

use std::collections::HashSet;
use std::fmt;

use super::parser::Parser;

/// Parsed representation of a tag expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagExpression {
    root: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Failure to parse a tag expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExprError {
    offset: usize,
    reason: String,
}

impl TagExprError {
    pub(super) fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset of the offending input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for TagExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid tag expression at byte {}: {}",
            self.offset, self.reason
        )
    }
}

impl std::error::Error for TagExprError {}

impl TagExpression {
    /// Parse `input`.
    ///
    /// # Errors
    ///
    /// Returns [`TagExprError`] with the byte offset of the first problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_plan::TagExpression;
    ///
    /// let expr = TagExpression::parse("@smoke and not @wip").unwrap();
    /// assert!(expr.evaluate(["smoke"]));
    /// assert!(!expr.evaluate(["smoke", "wip"]));
    /// ```
    pub fn parse(input: &str) -> Result<Self, TagExprError> {
        let mut parser = Parser::new(input)?;
        let root = parser.parse_expression()?;
        parser.expect_end()?;
        Ok(Self { root })
    }

    /// Whether the tag names (without `@`) satisfy the expression.
    pub fn evaluate<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set: HashSet<&'a str> = tags.into_iter().collect();
        self.root.eval(&set)
    }
}

impl Expr {
    pub(super) fn eval(&self, tags: &HashSet<&str>) -> bool {
        match self {
            Self::Tag(tag) => tags.contains(tag.as_str()),
            Self::Not(inner) => !inner.eval(tags),
            Self::And(lhs, rhs) => lhs.eval(tags) && rhs.eval(tags),
            Self::Or(lhs, rhs) => lhs.eval(tags) || rhs.eval(tags),
        }
    }
}
