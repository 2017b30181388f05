//! Entry points combining the grammar engine with the document builder.

use crate::ast::{Document, Location};
use crate::builder::AstBuilder;
use crate::dialect::Dialect;
use crate::errors::ParseError;
use crate::grammar::{self, CollectErrors, FailFast};

/// Result of a parse that never stops at the first error.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Everything recovered from the input.
    pub document: Document,
    /// Every violation, in source order.
    pub errors: Vec<ParseError>,
}

impl Diagnostics {
    /// Whether the input parsed without any violation.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configurable parser.
///
/// # Examples
///
/// ```
/// use bdd_plan_gherkin::Parser;
///
/// let parser = Parser::new().with_default_language("es").unwrap();
/// let document = parser
///     .parse("Característica: Pagos\n  Escenario: Pagar\n    Dado un saldo\n")
///     .unwrap();
/// let feature = document.feature.unwrap();
/// assert_eq!(feature.language, "es");
/// assert_eq!(feature.name, "Pagos");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    dialect: &'static Dialect,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Parser starting in the English dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dialect: Dialect::english(),
        }
    }

    /// Use `code` for documents without a `# language:` header.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoSuchLanguage`] if no dialect is registered for
    /// `code`.
    pub fn with_default_language(mut self, code: &str) -> Result<Self, ParseError> {
        self.dialect = Dialect::get(code).ok_or_else(|| ParseError::NoSuchLanguage {
            language: code.to_string(),
            location: Location::new(1, 1),
        })?;
        Ok(self)
    }

    /// Dialect used when the document does not declare one.
    #[must_use]
    pub fn default_dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Parse `text`, stopping at the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first syntax or structural error.
    pub fn parse(&self, text: &str) -> Result<Document, ParseError> {
        let mut builder = AstBuilder::default();
        grammar::drive(text, self.dialect, &mut builder, &mut FailFast)?;
        Ok(builder.into_document())
    }

    /// Parse `text`, recording every violation and recovering as much of the
    /// document as possible.
    #[must_use]
    pub fn parse_with_diagnostics(&self, text: &str) -> Diagnostics {
        let mut builder = AstBuilder::default();
        let mut sink = CollectErrors::default();
        let outcome = grammar::drive(text, self.dialect, &mut builder, &mut sink);
        let mut errors = sink.into_errors();
        errors.extend(outcome.err());
        Diagnostics {
            document: builder.into_document(),
            errors,
        }
    }
}

/// Parse `text` with the default English dialect.
///
/// # Errors
///
/// Returns the first syntax or structural error.
///
/// # Examples
///
/// ```
/// let document = bdd_plan_gherkin::parse("Feature: Empty\n").unwrap();
/// assert_eq!(document.feature.map(|feature| feature.name), Some("Empty".into()));
/// ```
pub fn parse(text: &str) -> Result<Document, ParseError> {
    Parser::new().parse(text)
}
