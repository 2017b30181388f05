//! Plan tree produced by the compiler and rewritten by the redefinition
//! engine.
//!
//! Nodes own their children; a subtree that must appear in several places is
//! cloned, so no node is ever reachable through two parents.

use std::collections::BTreeMap;
use std::fmt;

use bdd_plan_gherkin::Location;
use derive_more::{Deref, IntoIterator};

/// Kind of a plan node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A compiled feature.
    Feature,
    /// A background block. Reserved; the compiler flags background steps
    /// instead of grouping them.
    Background,
    /// A runnable scenario, authored or expanded from an outline.
    Scenario,
    /// A scenario outline holding its concrete scenarios.
    ScenarioOutline,
    /// An authored step.
    Step,
    /// A synthetic step introduced by redefinition.
    VirtualStep,
}

impl NodeType {
    /// Upper-case label used in serialized plans.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "FEATURE",
            Self::Background => "BACKGROUND",
            Self::Scenario => "SCENARIO",
            Self::ScenarioOutline => "SCENARIO_OUTLINE",
            Self::Step => "STEP",
            Self::VirtualStep => "VIRTUAL_STEP",
        }
    }

    /// Whether nodes of this type are steps.
    #[must_use]
    pub fn is_step(&self) -> bool {
        matches!(self, Self::Step | Self::VirtualStep)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a node was authored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    /// Resource the document was read from.
    pub resource: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl Source {
    /// Locator for `location` inside `resource`.
    #[must_use]
    pub fn new(resource: &str, location: Location) -> Self {
        Self {
            resource: resource.to_string(),
            line: location.line,
            column: location.column,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{}]", self.resource, self.line, self.column)
    }
}

/// Argument attached to a step node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepData {
    /// Data table rows, header included.
    DataTable(Vec<Vec<String>>),
    /// Doc string content.
    Document {
        /// The text between the separators.
        content: String,
        /// Content type written after the opening separator.
        content_type: Option<String>,
    },
}

impl StepData {
    /// Copy with every cell or the document content passed through `replace`.
    pub(crate) fn map_text<F>(&self, replace: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        match self {
            Self::DataTable(rows) => Self::DataTable(
                rows.iter()
                    .map(|row| row.iter().map(|cell| replace(cell)).collect())
                    .collect(),
            ),
            Self::Document {
                content,
                content_type,
            } => Self::Document {
                content: replace(content),
                content_type: content_type.clone(),
            },
        }
    }
}

/// One examples block of an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamplesTable {
    /// Tags of the block, without `@`.
    pub tags: Vec<String>,
    /// Column names.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
}

/// What an outline needs to generate concrete scenarios again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineTemplate {
    /// Outline steps with placeholders left in place.
    pub steps: Vec<PlanNode>,
    /// Examples blocks in document order.
    pub examples: Vec<ExamplesTable>,
    /// Background steps of the enclosing feature, flagged.
    pub background: Vec<PlanNode>,
}

/// A node of the plan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    /// Node kind.
    pub node_type: NodeType,
    /// Id taken from an id tag, if any.
    pub id: Option<String>,
    /// Title or step text.
    pub name: String,
    /// Keyword as written, trimmed.
    pub keyword: String,
    /// Dialect code of the source document.
    pub language: String,
    /// Description lines, trimmed.
    pub description: Vec<String>,
    /// Tags without `@`, in first-seen order.
    pub tags: Vec<String>,
    /// Properties declared in `# key: value` comments, plus inherited ones.
    pub properties: BTreeMap<String, String>,
    /// Where the node was authored; synthetic nodes have none.
    pub source: Option<Source>,
    /// Whether the step comes from the feature background.
    pub background: bool,
    /// Step argument.
    pub data: Option<StepData>,
    /// Children in execution order.
    pub children: Vec<PlanNode>,
    /// Outline template, kept on scenario outlines only.
    pub outline: Option<Box<OutlineTemplate>>,
}

impl PlanNode {
    /// Empty node of `node_type` named `name`.
    #[must_use]
    pub fn new(node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            node_type,
            id: None,
            name: name.into(),
            keyword: String::new(),
            language: String::new(),
            description: Vec::new(),
            tags: Vec::new(),
            properties: BTreeMap::new(),
            source: None,
            background: false,
            data: None,
            children: Vec::new(),
            outline: None,
        }
    }

    /// Synthetic step with no source.
    #[must_use]
    pub fn virtual_step(name: impl Into<String>) -> Self {
        Self::new(NodeType::VirtualStep, name)
    }

    /// Whether the node carries `tag` (without `@`).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Append `tags`, skipping ones already present.
    pub fn add_tags<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = String>,
    {
        for tag in tags {
            if !self.has_tag(&tag) {
                self.tags.push(tag);
            }
        }
    }

    /// Human-readable label used in logs and errors.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.node_type, &self.id) {
            (NodeType::Scenario | NodeType::ScenarioOutline, Some(id)) => {
                format!("[{id}] {}: {}", self.keyword, self.name)
            }
            (NodeType::Step, _) => format!("{} {}", self.keyword, self.name),
            (NodeType::VirtualStep, _) => self.name.clone(),
            _ => format!("{}: {}", self.keyword, self.name),
        }
    }

    /// Source locator, or `<synthetic>` for generated nodes.
    #[must_use]
    pub fn locator(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "<synthetic>".to_string(), ToString::to_string)
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Self),
    {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}

/// Root of a compiled plan: one node per feature, in resource order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct Plan {
    /// Compiled features.
    pub features: Vec<PlanNode>,
}

impl Plan {
    /// Visit every node of the plan, depth first.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a PlanNode),
    {
        for feature in &self.features {
            feature.walk(visit);
        }
    }

    /// First node, depth first, satisfying `predicate`.
    #[must_use]
    pub fn find<P>(&self, predicate: P) -> Option<&PlanNode>
    where
        P: Fn(&PlanNode) -> bool,
    {
        let mut found = None;
        self.walk(&mut |node| {
            if found.is_none() && predicate(node) {
                found = Some(node);
            }
        });
        found
    }
}
