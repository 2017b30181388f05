//! Semantic error types for plan compilation.
//!
//! Parse failures are wrapped unchanged; redefinition failures name the
//! source locator and display name of every node involved so authors can
//! find the offending scenario without re-running anything.

use thiserror::Error;

use bdd_plan_gherkin::ParseError;

/// Failures raised while merging definition and implementation scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedefinitionError {
    /// Two nodes sharing a redefinition tag reuse the same id.
    #[error(
        "more than one {tag} node using the id '{id}'\n\t<{source_a}>::'{name_a}'\n\t<{source_b}>::'{name_b}'"
    )]
    DuplicateId {
        /// The repeated id.
        id: String,
        /// The redefinition tag both nodes carry.
        tag: String,
        /// Locator of the node found second.
        source_a: String,
        /// Display name of the node found second.
        name_a: String,
        /// Locator of the node found first.
        source_b: String,
        /// Display name of the node found first.
        name_b: String,
    },

    /// A definition scenario has no implementation counterpart.
    #[error("problem in {locator} '{name}'\n\tNo implementation scenario with id '{id}'")]
    MissingImplementation {
        /// Id of the definition scenario.
        id: String,
        /// Locator of the definition scenario.
        locator: String,
        /// Display name of the definition scenario.
        name: String,
    },

    /// A definition scenario outline has no implementation counterpart.
    #[error(
        "cannot redefine scenario outline <{locator}>::'{name}'\n\tNo implementation scenario outline with id '{id}'"
    )]
    MissingOutlineImplementation {
        /// Id of the definition outline.
        id: String,
        /// Locator of the definition outline.
        locator: String,
        /// Display name of the definition outline.
        name: String,
    },

    /// A step map lists more entries than the definition has steps.
    #[error("bad definition of step map in {locator} : {step_map}")]
    BadStepMap {
        /// Locator of the implementation node.
        locator: String,
        /// The raw property value.
        step_map: String,
    },

    /// Leftover implementation steps have no definition step to attach to.
    #[error("definition scenario <{locator}>::'{name}' has no steps to receive implementation steps")]
    NoDefinitionSteps {
        /// Locator of the definition scenario.
        locator: String,
        /// Display name of the definition scenario.
        name: String,
    },
}

/// Errors that can occur while building a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A document failed to parse.
    #[error("{resource}: {error}")]
    Parse {
        /// Resource the document was read from.
        resource: String,
        /// The underlying parse failure.
        #[source]
        error: ParseError,
    },

    /// Merging redefined scenarios failed.
    #[error(transparent)]
    Redefinition(#[from] RedefinitionError),

    /// An element carries more than one id tag.
    #[error("more than one id tag found in element {name} ({locator}): {tags:?}")]
    AmbiguousId {
        /// Name of the element.
        name: String,
        /// Locator of the element.
        locator: String,
        /// Every matching tag.
        tags: Vec<String>,
    },

    /// The id tag pattern is not a valid regular expression.
    #[error("invalid id tag pattern '{pattern}': {error}")]
    InvalidIdPattern {
        /// The configured pattern.
        pattern: String,
        /// Compilation failure reported by the regex engine.
        #[source]
        error: regex::Error,
    },

    /// The tag filter expression does not parse.
    #[error("invalid tag filter '{expression}': {reason}")]
    InvalidTagFilter {
        /// The configured expression.
        expression: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlanError {
    /// The wrapped parse error, if any.
    #[must_use]
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { error, .. } => Some(error),
            _ => None,
        }
    }
}
