//! Scratch nodes stored in the builder arena.

use std::mem;

use crate::ast::{
    Comment, DataTable, DocString, Document, Examples, Feature, FeatureChild, Step, TableRow, Tag,
};
use crate::grammar::RuleType;
use crate::token::{Token, TokenType};

/// Index of a node inside the builder arena.
pub(super) type AstId = usize;

#[derive(Debug)]
pub(super) enum Entry {
    Token {
        token: Token,
        comments: Vec<Comment>,
    },
    Rule {
        rule: RuleType,
        value: Reduced,
    },
}

/// Value a closed rule contributes to its parent.
#[derive(Debug)]
pub(super) enum Reduced {
    /// A rule kept in the arena until its parent reduces it.
    Node(AstId),
    Tags(Vec<Tag>),
    Description(String),
    Step(Step),
    DataTable(DataTable),
    DocString(DocString),
    Rows(Vec<TableRow>),
    Examples(Examples),
    Child(FeatureChild),
    Feature(Feature),
    Document(Document),
}

impl Reduced {
    pub(super) fn into_node(self) -> Option<AstId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    pub(super) fn into_tags(self) -> Option<Vec<Tag>> {
        match self {
            Self::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub(super) fn into_description(self) -> Option<String> {
        match self {
            Self::Description(description) => Some(description),
            _ => None,
        }
    }

    pub(super) fn into_step(self) -> Option<Step> {
        match self {
            Self::Step(step) => Some(step),
            _ => None,
        }
    }

    pub(super) fn into_data_table(self) -> Option<DataTable> {
        match self {
            Self::DataTable(table) => Some(table),
            _ => None,
        }
    }

    pub(super) fn into_doc_string(self) -> Option<DocString> {
        match self {
            Self::DocString(doc_string) => Some(doc_string),
            _ => None,
        }
    }

    pub(super) fn into_rows(self) -> Option<Vec<TableRow>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub(super) fn into_examples(self) -> Option<Examples> {
        match self {
            Self::Examples(examples) => Some(examples),
            _ => None,
        }
    }

    pub(super) fn into_child(self) -> Option<FeatureChild> {
        match self {
            Self::Child(child) => Some(child),
            _ => None,
        }
    }

    pub(super) fn into_feature(self) -> Option<Feature> {
        match self {
            Self::Feature(feature) => Some(feature),
            _ => None,
        }
    }

    pub(super) fn into_document(self) -> Option<Document> {
        match self {
            Self::Document(document) => Some(document),
            _ => None,
        }
    }
}

/// Ordered multimap of the tokens and reduced rules collected for one rule.
#[derive(Debug, Default)]
pub(super) struct AstNode {
    pub(super) rule: RuleType,
    entries: Vec<Entry>,
}

impl AstNode {
    pub(super) fn new(rule: RuleType) -> Self {
        Self {
            rule,
            entries: Vec::new(),
        }
    }

    pub(super) fn push_token(&mut self, token: Token, comments: Vec<Comment>) {
        self.entries.push(Entry::Token { token, comments });
    }

    pub(super) fn push_rule(&mut self, rule: RuleType, value: Reduced) {
        self.entries.push(Entry::Rule { rule, value });
    }

    pub(super) fn tokens(&self, kind: TokenType) -> impl Iterator<Item = &Token> {
        self.entries.iter().filter_map(move |entry| match entry {
            Entry::Token { token, .. } if token.kind == kind => Some(token),
            Entry::Token { .. } | Entry::Rule { .. } => None,
        })
    }

    /// Remove the first token of `kind` along with its comments.
    pub(super) fn take_token(&mut self, kind: TokenType) -> Option<(Token, Vec<Comment>)> {
        let index = self.entries.iter().position(
            |entry| matches!(entry, Entry::Token { token, .. } if token.kind == kind),
        )?;
        match self.entries.remove(index) {
            Entry::Token { token, comments } => Some((token, comments)),
            Entry::Rule { .. } => None,
        }
    }

    /// Remove the first value reduced from `rule`.
    pub(super) fn take_rule(&mut self, rule: RuleType) -> Option<Reduced> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Rule { rule: found, .. } if *found == rule))?;
        match self.entries.remove(index) {
            Entry::Rule { value, .. } => Some(value),
            Entry::Token { .. } => None,
        }
    }

    /// Remove every value reduced from `rule`, in order.
    pub(super) fn drain_rules(&mut self, rule: RuleType) -> Vec<Reduced> {
        let (matching, rest): (Vec<_>, Vec<_>) = mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| matches!(entry, Entry::Rule { rule: found, .. } if *found == rule));
        self.entries = rest;
        matching
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Rule { value, .. } => Some(value),
                Entry::Token { .. } => None,
            })
            .collect()
    }

    /// Every reduced value, in order, regardless of rule.
    pub(super) fn into_values(self) -> impl Iterator<Item = Reduced> {
        self.entries.into_iter().filter_map(|entry| match entry {
            Entry::Rule { value, .. } => Some(value),
            Entry::Token { .. } => None,
        })
    }
}
