//! Classified source lines handed from the matcher to the grammar engine.

use std::fmt;

use crate::ast::Location;
use crate::dialect::Dialect;

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// End of input.
    Eof,
    /// A blank line.
    Empty,
    /// A line whose first non-blank character is `#`.
    Comment,
    /// A line made only of `@tag` words.
    TagLine,
    /// A feature keyword followed by `:`.
    FeatureLine,
    /// A background keyword followed by `:`.
    BackgroundLine,
    /// A scenario keyword followed by `:`.
    ScenarioLine,
    /// A scenario outline keyword followed by `:`.
    ScenarioOutlineLine,
    /// An examples keyword followed by `:`.
    ExamplesLine,
    /// A line starting with a step keyword.
    StepLine,
    /// A doc-string opening or closing separator.
    DocStringSeparator,
    /// A line starting with `|`.
    TableRow,
    /// A `# language: xx` header.
    Language,
    /// Any other text.
    Other,
}

impl TokenType {
    /// Name used in diagnostics, e.g. `#StepLine`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eof => "#EOF",
            Self::Empty => "#Empty",
            Self::Comment => "#Comment",
            Self::TagLine => "#TagLine",
            Self::FeatureLine => "#FeatureLine",
            Self::BackgroundLine => "#BackgroundLine",
            Self::ScenarioLine => "#ScenarioLine",
            Self::ScenarioOutlineLine => "#ScenarioOutlineLine",
            Self::ExamplesLine => "#ExamplesLine",
            Self::StepLine => "#StepLine",
            Self::DocStringSeparator => "#DocStringSeparator",
            Self::TableRow => "#TableRow",
            Self::Language => "#Language",
            Self::Other => "#Other",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag or table cell located inside a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    /// 1-based column of the first character.
    pub column: usize,
    /// Text of the item.
    pub text: String,
}

/// A classified line.
#[derive(Debug, Clone)]
pub struct Token {
    /// Line classification.
    pub kind: TokenType,
    /// Position of the first significant character.
    pub location: Location,
    /// Matched keyword, if the line starts with one.
    pub keyword: Option<String>,
    /// Title, step text, content type, language code or line text depending
    /// on the kind.
    pub text: String,
    /// Tags or table cells found on the line.
    pub items: Vec<LineSpan>,
    /// Dialect active when the line was matched.
    pub dialect: &'static Dialect,
}

impl Token {
    pub(crate) fn new(kind: TokenType, location: Location, dialect: &'static Dialect) -> Self {
        Self {
            kind,
            location,
            keyword: None,
            text: String::new(),
            items: Vec::new(),
            dialect,
        }
    }

    pub(crate) fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = Some(keyword.to_string());
        self
    }

    pub(crate) fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) fn with_items(mut self, items: Vec<LineSpan>) -> Self {
        self.items = items;
        self
    }
}
