//! Errors raised while parsing a document.
//!
//! Grammar violations carry the set of token types that would have been
//! accepted so callers can render precise diagnostics.

use thiserror::Error;

use crate::ast::Location;
use crate::token::TokenType;

/// Failure raised by the grammar engine, the matcher or the builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A line was classified as a token the grammar does not accept here.
    #[error("({location}): expected: {}, got '{received}'", describe(.expected))]
    UnexpectedToken {
        /// Position of the offending line.
        location: Location,
        /// Token types that would have been accepted.
        expected: Vec<TokenType>,
        /// Trimmed text of the offending line.
        received: String,
    },
    /// The document ended while a construct was still open.
    #[error("({location}): unexpected end of file, expected: {}", describe(.expected))]
    UnexpectedEof {
        /// Position just past the last line.
        location: Location,
        /// Token types that would have been accepted.
        expected: Vec<TokenType>,
    },
    /// A table row has a different number of cells than the first row.
    #[error("({location}): inconsistent cell count within the table")]
    InconsistentCellCount {
        /// Position of the offending row.
        location: Location,
    },
    /// A `# language:` header names an unknown dialect.
    #[error("({location}): language not supported: {language}")]
    NoSuchLanguage {
        /// The requested language code.
        language: String,
        /// Position of the header.
        location: Location,
    },
}

impl ParseError {
    /// Position the error refers to.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::UnexpectedToken { location, .. }
            | Self::UnexpectedEof { location, .. }
            | Self::InconsistentCellCount { location }
            | Self::NoSuchLanguage { location, .. } => *location,
        }
    }

    /// Whether the error is a grammar violation.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedToken { .. } | Self::UnexpectedEof { .. } | Self::NoSuchLanguage { .. }
        )
    }

    /// Whether the error is a table shape violation.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InconsistentCellCount { .. })
    }
}

fn describe(expected: &[TokenType]) -> String {
    expected
        .iter()
        .map(TokenType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
