//! Localised Gherkin parsing for bdd-plan.
//!
//! Lines are classified against a per-language keyword table, fed through a
//! deterministic grammar automaton and reduced by an arena-backed builder
//! into an immutable [`Document`]. Parsing either stops at the first error
//! ([`Parser::parse`]) or records every violation and recovers what it can
//! ([`Parser::parse_with_diagnostics`]).

mod ast;
mod builder;
mod dialect;
mod errors;
pub mod grammar;
mod keyword;
mod line;
mod matcher;
mod parser;
mod token;

pub use ast::{
    Background, Comment, DataTable, DocString, Document, Examples, Feature, FeatureChild,
    Location, Scenario, ScenarioOutline, Step, StepArgument, TableCell, TableRow, Tag,
};
pub use dialect::{DEFAULT_LANGUAGE, Dialect};
pub use errors::ParseError;
pub use keyword::StepKeyword;
pub use parser::{Diagnostics, Parser, parse};
pub use token::{LineSpan, Token, TokenType};
