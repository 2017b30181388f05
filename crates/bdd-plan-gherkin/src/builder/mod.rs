//! Stack machine assembling the document model from grammar events.
//!
//! Rules are allocated in an arena and addressed by index. Closing a rule
//! pops it from the stack and reduces it into a typed value that is attached
//! to the new top. Headers and scenario bodies stay in the arena as
//! [`Reduced::Node`] until the enclosing definition rule consumes them.

mod node;

use std::mem;

use self::node::{AstId, AstNode, Reduced};
use crate::ast::{
    Background, Comment, DataTable, DocString, Document, Examples, Feature, FeatureChild,
    Location, Scenario, ScenarioOutline, Step, StepArgument, TableCell, TableRow, Tag,
};
use crate::errors::ParseError;
use crate::grammar::{Builder, RuleType};
use crate::token::{Token, TokenType};

const ROOT: AstId = 0;

/// Builder producing a [`Document`].
#[derive(Debug)]
pub(crate) struct AstBuilder {
    arena: Vec<AstNode>,
    stack: Vec<AstId>,
    pending_comments: Vec<Comment>,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self {
            arena: vec![AstNode::new(RuleType::None)],
            stack: vec![ROOT],
            pending_comments: Vec::new(),
        }
    }
}

impl AstBuilder {
    /// The reduced document, or an empty one if the document rule never
    /// closed.
    pub(crate) fn into_document(mut self) -> Document {
        self.take(ROOT)
            .take_rule(RuleType::Document)
            .and_then(Reduced::into_document)
            .unwrap_or_default()
    }

    fn current_mut(&mut self) -> Option<&mut AstNode> {
        let id = self.stack.last().copied()?;
        self.arena.get_mut(id)
    }

    fn take(&mut self, id: AstId) -> AstNode {
        self.arena
            .get_mut(id)
            .map(mem::take)
            .unwrap_or_default()
    }

    fn restore(&mut self, id: AstId, node: AstNode) {
        if let Some(slot) = self.arena.get_mut(id) {
            *slot = node;
        }
    }

    /// Take the arena node stored under `rule` in `parent`.
    fn take_child(&mut self, parent: &mut AstNode, rule: RuleType) -> Option<AstNode> {
        let id = parent.take_rule(rule)?.into_node()?;
        Some(self.take(id))
    }

    fn reduce(&mut self, id: AstId, mut node: AstNode) -> Result<Option<Reduced>, ParseError> {
        let reduced = match node.rule {
            RuleType::None => None,
            RuleType::Step => reduce_step(node).map(Reduced::Step),
            RuleType::DocString => reduce_doc_string(&node).map(Reduced::DocString),
            RuleType::DataTable => reduce_data_table(&node)?.map(Reduced::DataTable),
            RuleType::ExamplesTable => Some(Reduced::Rows(table_rows(&node)?)),
            RuleType::Tags => Some(Reduced::Tags(tags(&node))),
            RuleType::Description => Some(Reduced::Description(description(&node))),
            RuleType::Background => reduce_background(node).map(Reduced::Child),
            RuleType::FeatureHeader
            | RuleType::Scenario
            | RuleType::ScenarioOutline
            | RuleType::Examples => {
                self.restore(id, node);
                Some(Reduced::Node(id))
            }
            RuleType::ScenarioDefinition => self.reduce_scenario_definition(node).map(Reduced::Child),
            RuleType::ExamplesDefinition => {
                self.reduce_examples_definition(node).map(Reduced::Examples)
            }
            RuleType::Feature => self.reduce_feature(node).map(Reduced::Feature),
            RuleType::Document => Some(Reduced::Document(Document {
                feature: node
                    .take_rule(RuleType::Feature)
                    .and_then(Reduced::into_feature),
            })),
        };
        Ok(reduced)
    }

    fn reduce_scenario_definition(&mut self, mut node: AstNode) -> Option<FeatureChild> {
        let tags = take_tags(&mut node);
        if let Some(mut scenario) = self.take_child(&mut node, RuleType::Scenario) {
            let (token, comments) = scenario.take_token(TokenType::ScenarioLine)?;
            return Some(FeatureChild::Scenario(Scenario {
                tags,
                location: token.location,
                keyword: token.keyword.unwrap_or_default(),
                name: token.text,
                description: take_description(&mut scenario),
                steps: take_steps(&mut scenario),
                comments,
            }));
        }
        let mut outline = self.take_child(&mut node, RuleType::ScenarioOutline)?;
        let (token, comments) = outline.take_token(TokenType::ScenarioOutlineLine)?;
        let description = take_description(&mut outline);
        let steps = take_steps(&mut outline);
        let examples = outline
            .drain_rules(RuleType::ExamplesDefinition)
            .into_iter()
            .filter_map(Reduced::into_examples)
            .collect();
        Some(FeatureChild::ScenarioOutline(ScenarioOutline {
            tags,
            location: token.location,
            keyword: token.keyword.unwrap_or_default(),
            name: token.text,
            description,
            steps,
            examples,
            comments,
        }))
    }

    fn reduce_examples_definition(&mut self, mut node: AstNode) -> Option<Examples> {
        let tags = take_tags(&mut node);
        let mut examples = self.take_child(&mut node, RuleType::Examples)?;
        let (token, _) = examples.take_token(TokenType::ExamplesLine)?;
        let description = take_description(&mut examples);
        let mut rows = examples
            .take_rule(RuleType::ExamplesTable)
            .and_then(Reduced::into_rows)
            .unwrap_or_default()
            .into_iter();
        let header = rows.next();
        Some(Examples {
            tags,
            location: token.location,
            keyword: token.keyword.unwrap_or_default(),
            name: token.text,
            description,
            header,
            body: rows.collect(),
        })
    }

    /// A feature without a header or title line degrades to no feature.
    fn reduce_feature(&mut self, mut node: AstNode) -> Option<Feature> {
        let mut header = self.take_child(&mut node, RuleType::FeatureHeader)?;
        let (token, comments) = header.take_token(TokenType::FeatureLine)?;
        let tags = take_tags(&mut header);
        let description = take_description(&mut header);
        let children = node.into_values().filter_map(Reduced::into_child).collect();
        Some(Feature {
            tags,
            location: token.location,
            language: token.dialect.code().to_string(),
            keyword: token.keyword.unwrap_or_default(),
            name: token.text,
            description,
            children,
            comments,
        })
    }
}

impl Builder for AstBuilder {
    fn start_rule(&mut self, rule: RuleType) {
        let id = self.arena.len();
        self.arena.push(AstNode::new(rule));
        self.stack.push(id);
    }

    fn build(&mut self, token: Token) {
        match token.kind {
            TokenType::Comment => self.pending_comments.push(Comment {
                location: token.location,
                text: token.text,
            }),
            TokenType::Empty | TokenType::Eof => {}
            kind => {
                let comments = if is_anchor(kind) {
                    mem::take(&mut self.pending_comments)
                } else {
                    Vec::new()
                };
                if let Some(node) = self.current_mut() {
                    node.push_token(token, comments);
                }
            }
        }
    }

    fn end_rule(&mut self, rule: RuleType) -> Result<(), ParseError> {
        if self.stack.len() <= 1 {
            return Ok(());
        }
        let Some(id) = self.stack.pop() else {
            return Ok(());
        };
        let node = self.take(id);
        if let Some(value) = self.reduce(id, node)? {
            if let Some(parent) = self.current_mut() {
                parent.push_rule(rule, value);
            }
        }
        Ok(())
    }
}

/// Tokens that collect the comments written above them.
fn is_anchor(kind: TokenType) -> bool {
    matches!(
        kind,
        TokenType::FeatureLine
            | TokenType::BackgroundLine
            | TokenType::ScenarioLine
            | TokenType::ScenarioOutlineLine
            | TokenType::StepLine
    )
}

fn take_tags(node: &mut AstNode) -> Vec<Tag> {
    node.take_rule(RuleType::Tags)
        .and_then(Reduced::into_tags)
        .unwrap_or_default()
}

fn take_description(node: &mut AstNode) -> Option<String> {
    node.take_rule(RuleType::Description)
        .and_then(Reduced::into_description)
}

/// Steps in order, with `And`/`But` resolved against the preceding step.
fn take_steps(node: &mut AstNode) -> Vec<Step> {
    let mut previous = None;
    node.drain_rules(RuleType::Step)
        .into_iter()
        .filter_map(Reduced::into_step)
        .map(|mut step| {
            step.keyword_type = step.keyword_type.resolve(&mut previous);
            step
        })
        .collect()
}

fn reduce_step(mut node: AstNode) -> Option<Step> {
    let (token, comments) = node.take_token(TokenType::StepLine)?;
    let argument = node
        .take_rule(RuleType::DataTable)
        .and_then(Reduced::into_data_table)
        .map(StepArgument::DataTable)
        .or_else(|| {
            node.take_rule(RuleType::DocString)
                .and_then(Reduced::into_doc_string)
                .map(StepArgument::DocString)
        });
    let keyword = token.keyword.unwrap_or_default();
    Some(Step {
        location: token.location,
        keyword_type: token.dialect.step_keyword_type(&keyword),
        keyword,
        text: token.text,
        argument,
        comments,
    })
}

fn reduce_doc_string(node: &AstNode) -> Option<DocString> {
    let open = node.tokens(TokenType::DocStringSeparator).next()?;
    let content = node
        .tokens(TokenType::Other)
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Some(DocString {
        location: open.location,
        delimiter: open.keyword.clone().unwrap_or_default(),
        content_type: (!open.text.is_empty()).then(|| open.text.clone()),
        content,
    })
}

fn reduce_data_table(node: &AstNode) -> Result<Option<DataTable>, ParseError> {
    let rows = table_rows(node)?;
    Ok(rows.first().map(|first| first.location).map(|location| DataTable { location, rows }))
}

/// Rows of a table; every row must have as many cells as the first.
fn table_rows(node: &AstNode) -> Result<Vec<TableRow>, ParseError> {
    let rows: Vec<TableRow> = node
        .tokens(TokenType::TableRow)
        .map(|token| TableRow {
            location: token.location,
            cells: token
                .items
                .iter()
                .map(|item| TableCell {
                    location: Location::new(token.location.line, item.column),
                    value: item.text.clone(),
                })
                .collect(),
        })
        .collect();
    let width = rows.first().map(|row| row.cells.len());
    if let Some(row) = rows.iter().find(|row| Some(row.cells.len()) != width) {
        return Err(ParseError::InconsistentCellCount {
            location: row.location,
        });
    }
    Ok(rows)
}

fn tags(node: &AstNode) -> Vec<Tag> {
    node.tokens(TokenType::TagLine)
        .flat_map(|token| {
            token.items.iter().map(|item| Tag {
                location: Location::new(token.location.line, item.column),
                name: item.text.clone(),
            })
        })
        .collect()
}

/// Description lines joined with `\n`, without trailing blank lines.
fn description(node: &AstNode) -> String {
    let mut lines: Vec<&str> = node
        .tokens(TokenType::Other)
        .map(|token| token.text.as_str())
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn reduce_background(mut node: AstNode) -> Option<FeatureChild> {
    let (token, comments) = node.take_token(TokenType::BackgroundLine)?;
    Some(FeatureChild::Background(Background {
        location: token.location,
        keyword: token.keyword.unwrap_or_default(),
        name: token.text,
        description: take_description(&mut node),
        steps: take_steps(&mut node),
        comments,
    }))
}
