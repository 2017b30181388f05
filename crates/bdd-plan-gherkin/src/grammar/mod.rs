//! Token-driven automaton implementing the feature grammar.
//!
//! The engine classifies each line with the token types the current state
//! accepts, then reports `start_rule`, `build` and `end_rule` events to a
//! [`Builder`]. Violations go to an [`ErrorSink`]: [`FailFast`] aborts on the
//! first one, [`CollectErrors`] records it and keeps going so editors can
//! still recover a partial document.
//!
//! ```text
//! Document            := Feature?
//! Feature             := FeatureHeader Background? ScenarioDefinition*
//! FeatureHeader       := #Language? Tags? #FeatureLine DescriptionHelper
//! Background          := #BackgroundLine DescriptionHelper Step*
//! ScenarioDefinition  := Tags? (Scenario | ScenarioOutline)
//! Scenario            := #ScenarioLine DescriptionHelper Step*
//! ScenarioOutline     := #ScenarioOutlineLine DescriptionHelper Step* ExamplesDefinition+
//! ExamplesDefinition  := Tags? Examples
//! Examples            := #ExamplesLine DescriptionHelper ExamplesTable?
//! ExamplesTable       := #TableRow+
//! Step                := #StepLine (DataTable | DocString)?
//! DataTable           := #TableRow+
//! DocString           := #DocStringSeparator #Other* #DocStringSeparator
//! Tags                := #TagLine+
//! DescriptionHelper   := #Empty* Description? #Comment*
//! Description         := #Other+
//! ```

mod engine;
mod state;

use crate::dialect::Dialect;
use crate::errors::ParseError;
use crate::token::Token;

/// Grammar rules reported to a [`Builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleType {
    /// Scratch root used by builders before the document starts.
    #[default]
    None,
    /// The whole input.
    Document,
    /// A feature with its children.
    Feature,
    /// Language header, tags, title and description of a feature.
    FeatureHeader,
    /// A background block.
    Background,
    /// Tags followed by a scenario or an outline.
    ScenarioDefinition,
    /// A scenario block.
    Scenario,
    /// A scenario outline block.
    ScenarioOutline,
    /// Tags followed by an examples block.
    ExamplesDefinition,
    /// An examples block.
    Examples,
    /// Rows of an examples block.
    ExamplesTable,
    /// A step with its optional argument.
    Step,
    /// Rows attached to a step.
    DataTable,
    /// Free text attached to a step.
    DocString,
    /// One or more tag lines.
    Tags,
    /// Free text below a title.
    Description,
}

/// Receiver of grammar events.
pub trait Builder {
    /// A rule opens.
    fn start_rule(&mut self, rule: RuleType);

    /// A token is shifted into the innermost open rule.
    fn build(&mut self, token: Token);

    /// The innermost open rule closes.
    ///
    /// # Errors
    ///
    /// Returns an error when the rule's content violates a structural
    /// constraint, such as a table with rows of different widths.
    fn end_rule(&mut self, rule: RuleType) -> Result<(), ParseError>;
}

/// Destination for grammar violations.
pub trait ErrorSink {
    /// Accept an error; returning it aborts parsing.
    ///
    /// # Errors
    ///
    /// Returns the error when parsing should stop.
    fn report(&mut self, error: ParseError) -> Result<(), ParseError>;
}

/// Sink that stops at the first error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailFast;

impl ErrorSink for FailFast {
    fn report(&mut self, error: ParseError) -> Result<(), ParseError> {
        Err(error)
    }
}

/// Sink that records every error and lets parsing continue.
#[derive(Debug, Default, Clone)]
pub struct CollectErrors {
    errors: Vec<ParseError>,
}

impl CollectErrors {
    /// Errors recorded so far, in report order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume the sink and return its errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}

impl ErrorSink for CollectErrors {
    fn report(&mut self, error: ParseError) -> Result<(), ParseError> {
        self.errors.push(error);
        Ok(())
    }
}

/// Run the grammar over `text`, starting in `dialect`.
///
/// # Errors
///
/// Returns the first error the sink refuses to absorb.
pub fn drive<B, S>(
    text: &str,
    dialect: &'static Dialect,
    builder: &mut B,
    sink: &mut S,
) -> Result<(), ParseError>
where
    B: Builder + ?Sized,
    S: ErrorSink + ?Sized,
{
    engine::Engine::new(dialect, builder, sink).run(text)
}

#[cfg(test)]
mod tests;
