//! Tag-expression parsing and tag-set utilities.
//!
//! Plan nodes store tag names without the leading `@`; expressions are
//! written with it (`@smoke and not @wip`) and evaluated against those names.
mod ast;
mod lexer;
mod parser;
mod sets;

pub use ast::{TagExprError, TagExpression};
pub(crate) use sets::tag_names;
