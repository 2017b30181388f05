//! Typed document model produced by the builder.
//!
//! Values are built once per parse and are read-only afterwards. Every node
//! keeps its 1-based [`Location`] so later stages can point back at the
//! source text.

use std::fmt;

use crate::keyword::StepKeyword;

/// 1-based line and column inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl Location {
    /// Create a location from a line and column pair.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// The feature, absent for empty or comment-only documents.
    pub feature: Option<Feature>,
}

/// A feature with its optional background and scenario definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Tags written above the feature line.
    pub tags: Vec<Tag>,
    /// Location of the feature line.
    pub location: Location,
    /// Code of the dialect the feature was written in.
    pub language: String,
    /// Localised keyword, e.g. `Feature` or `Característica`.
    pub keyword: String,
    /// Title following the keyword.
    pub name: String,
    /// Free text between the title and the first child.
    pub description: Option<String>,
    /// Background and scenario definitions in document order.
    pub children: Vec<FeatureChild>,
    /// Comments attached to the feature line.
    pub comments: Vec<Comment>,
}

impl Feature {
    /// The feature background, if one was declared.
    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.children.iter().find_map(|child| match child {
            FeatureChild::Background(background) => Some(background),
            FeatureChild::Scenario(_) | FeatureChild::ScenarioOutline(_) => None,
        })
    }
}

/// Direct child of a [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureChild {
    /// Steps shared by every scenario of the feature.
    Background(Background),
    /// A concrete scenario.
    Scenario(Scenario),
    /// A templated scenario expanded against examples.
    ScenarioOutline(ScenarioOutline),
}

/// Steps prepended to every scenario of a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    /// Location of the background line.
    pub location: Location,
    /// Localised keyword.
    pub keyword: String,
    /// Optional title.
    pub name: String,
    /// Free text below the title.
    pub description: Option<String>,
    /// Background steps in order.
    pub steps: Vec<Step>,
    /// Comments attached to the background line.
    pub comments: Vec<Comment>,
}

/// A concrete scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Tags written above the scenario line.
    pub tags: Vec<Tag>,
    /// Location of the scenario line.
    pub location: Location,
    /// Localised keyword.
    pub keyword: String,
    /// Scenario title.
    pub name: String,
    /// Free text below the title.
    pub description: Option<String>,
    /// Steps in order.
    pub steps: Vec<Step>,
    /// Comments attached to the scenario line.
    pub comments: Vec<Comment>,
}

/// A scenario template with one or more examples blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutline {
    /// Tags written above the outline line.
    pub tags: Vec<Tag>,
    /// Location of the outline line.
    pub location: Location,
    /// Localised keyword.
    pub keyword: String,
    /// Outline title, which may contain placeholders.
    pub name: String,
    /// Free text below the title.
    pub description: Option<String>,
    /// Template steps containing `<placeholder>` references.
    pub steps: Vec<Step>,
    /// Examples blocks in document order.
    pub examples: Vec<Examples>,
    /// Comments attached to the outline line.
    pub comments: Vec<Comment>,
}

/// One examples block of a scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    /// Tags written above the examples line.
    pub tags: Vec<Tag>,
    /// Location of the examples line.
    pub location: Location,
    /// Localised keyword.
    pub keyword: String,
    /// Optional title.
    pub name: String,
    /// Free text below the title.
    pub description: Option<String>,
    /// Column names, absent when the block has no table.
    pub header: Option<TableRow>,
    /// Value rows, excluding the header.
    pub body: Vec<TableRow>,
}

/// A single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Location of the step line.
    pub location: Location,
    /// Localised keyword including its trailing space, e.g. `Given `.
    pub keyword: String,
    /// Keyword category with `And`/`But` resolved against earlier steps.
    pub keyword_type: StepKeyword,
    /// Text following the keyword.
    pub text: String,
    /// Attached data table or doc string.
    pub argument: Option<StepArgument>,
    /// Comments attached to the step line.
    pub comments: Vec<Comment>,
}

/// Argument attached below a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArgument {
    /// A pipe-delimited table.
    DataTable(DataTable),
    /// A delimited block of free text.
    DocString(DocString),
}

/// Table whose rows all share one cell count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Location of the first row.
    pub location: Location,
    /// Rows in order.
    pub rows: Vec<TableRow>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Location of the row.
    pub location: Location,
    /// Cells in order.
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Cell values in order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(|cell| cell.value.clone()).collect()
    }
}

/// One table cell with escapes already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Location of the first character of the trimmed value.
    pub location: Location,
    /// Cell content.
    pub value: String,
}

/// Free-text step argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocString {
    /// Location of the opening separator.
    pub location: Location,
    /// The separator used, either `"""` or a triple backtick.
    pub delimiter: String,
    /// Content type written after the opening separator.
    pub content_type: Option<String>,
    /// Content lines joined with `\n`.
    pub content: String,
}

/// A tag such as `@smoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Location of the `@`.
    pub location: Location,
    /// Tag text including the leading `@`.
    pub name: String,
}

/// A comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Location of the line.
    pub location: Location,
    /// The whole line as written.
    pub text: String,
}
