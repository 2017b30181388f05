//! Compiles parsed documents into plan trees.
//!
//! Background steps are copied, flagged, in front of every scenario. Each
//! outline keeps a template so concrete scenarios can be generated again
//! from another outline's examples during redefinition.

mod outline;
mod properties;

use std::collections::BTreeMap;

use bdd_plan_gherkin::{
    Background, Comment, Document, Examples, Feature, FeatureChild, Location, Scenario,
    ScenarioOutline, Step, StepArgument, TableRow, Tag,
};
use regex::Regex;
use tracing::debug;

pub(crate) use self::outline::expand;
use self::properties::properties_from_comments;
use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::node::{ExamplesTable, NodeType, OutlineTemplate, PlanNode, Source, StepData};
use crate::tags::{TagExpression, tag_names};

/// Property carrying the dialect code on feature nodes.
pub const LANGUAGE_PROPERTY: &str = "language";

/// Turns one document into a feature node.
#[derive(Debug, Clone)]
pub struct PlanCompiler {
    id_pattern: Option<Regex>,
    tag_filter: Option<TagExpression>,
}

/// Header fields shared by features, scenarios and outlines.
struct Header<'a> {
    tags: &'a [Tag],
    location: Location,
    keyword: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    comments: &'a [Comment],
}

impl PlanCompiler {
    /// Compiler using the id pattern and tag filter of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidIdPattern`] or
    /// [`PlanError::InvalidTagFilter`] when either setting does not parse.
    pub fn new(config: &PlanConfig) -> Result<Self, PlanError> {
        let id_pattern = config
            .id_tag_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|error| {
                    PlanError::InvalidIdPattern {
                        pattern: pattern.to_string(),
                        error,
                    }
                })
            })
            .transpose()?;
        let tag_filter = config
            .tag_filter
            .as_deref()
            .map(|expression| {
                TagExpression::parse(expression).map_err(|err| PlanError::InvalidTagFilter {
                    expression: expression.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;
        Ok(Self {
            id_pattern,
            tag_filter,
        })
    }

    /// Compile `document`, read from `resource`.
    ///
    /// Returns `None` when the document has no feature or every scenario was
    /// filtered out.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::AmbiguousId`] when an element carries more than
    /// one id tag.
    pub fn compile(
        &self,
        resource: &str,
        document: &Document,
    ) -> Result<Option<PlanNode>, PlanError> {
        let Some(feature) = &document.feature else {
            return Ok(None);
        };
        let mut node = self.feature_node(resource, feature)?;
        for child in &feature.children {
            let compiled = match child {
                FeatureChild::Background(_) => continue,
                FeatureChild::Scenario(scenario) => {
                    self.scenario(resource, feature, scenario, &node)?
                }
                FeatureChild::ScenarioOutline(outline) => {
                    self.scenario_outline(resource, feature, outline, &node)?
                }
            };
            if self.selects(&compiled) {
                node.children.push(compiled);
            }
        }
        debug!(
            resource,
            feature = %node.name,
            scenarios = node.children.len(),
            "compiled feature"
        );
        Ok((!node.children.is_empty()).then_some(node))
    }

    fn selects(&self, node: &PlanNode) -> bool {
        self.tag_filter
            .as_ref()
            .is_none_or(|filter| filter.evaluate(node.tags.iter().map(String::as_str)))
    }

    /// The id carried by `tags`: the whole name of the single tag matching
    /// the id pattern.
    fn id(&self, tags: &[String], name: &str, source: &Source) -> Result<Option<String>, PlanError> {
        let Some(pattern) = &self.id_pattern else {
            return Ok(None);
        };
        let matching: Vec<&String> = tags.iter().filter(|tag| pattern.is_match(tag)).collect();
        match matching.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some((*id).clone())),
            _ => Err(PlanError::AmbiguousId {
                name: name.to_string(),
                locator: source.to_string(),
                tags: matching.into_iter().cloned().collect(),
            }),
        }
    }

    /// Node of `node_type` with the header fields filled in; tags and
    /// properties extend those of `parent`.
    fn header_node(
        &self,
        node_type: NodeType,
        resource: &str,
        header: &Header<'_>,
        parent: Option<&PlanNode>,
    ) -> Result<PlanNode, PlanError> {
        let own_tags = tag_names(header.tags);
        let source = Source::new(resource, header.location);
        let mut node = PlanNode::new(node_type, header.name.trim());
        node.id = self.id(&own_tags, header.name, &source)?;
        node.keyword = header.keyword.trim().to_string();
        node.description = description_lines(header.description);
        let inherited = parent.map(|parent| &parent.properties);
        node.properties = properties_from_comments(header.comments, inherited);
        if let Some(parent) = parent {
            node.language.clone_from(&parent.language);
            node.add_tags(parent.tags.iter().cloned());
        }
        node.add_tags(own_tags);
        node.source = Some(source);
        Ok(node)
    }

    fn feature_node(&self, resource: &str, feature: &Feature) -> Result<PlanNode, PlanError> {
        let header = Header {
            tags: &feature.tags,
            location: feature.location,
            keyword: &feature.keyword,
            name: &feature.name,
            description: feature.description.as_deref(),
            comments: &feature.comments,
        };
        let mut node = self.header_node(NodeType::Feature, resource, &header, None)?;
        node.language.clone_from(&feature.language);
        node.properties
            .insert(LANGUAGE_PROPERTY.to_string(), feature.language.clone());
        Ok(node)
    }

    fn scenario(
        &self,
        resource: &str,
        feature: &Feature,
        scenario: &Scenario,
        parent: &PlanNode,
    ) -> Result<PlanNode, PlanError> {
        let header = Header {
            tags: &scenario.tags,
            location: scenario.location,
            keyword: &scenario.keyword,
            name: &scenario.name,
            description: scenario.description.as_deref(),
            comments: &scenario.comments,
        };
        let mut node = self.header_node(NodeType::Scenario, resource, &header, Some(parent))?;
        node.children = background_steps(resource, feature.background(), &node);
        let own = steps(resource, &scenario.steps, &node);
        node.children.extend(own);
        Ok(node)
    }

    fn scenario_outline(
        &self,
        resource: &str,
        feature: &Feature,
        outline: &ScenarioOutline,
        parent: &PlanNode,
    ) -> Result<PlanNode, PlanError> {
        let header = Header {
            tags: &outline.tags,
            location: outline.location,
            keyword: &outline.keyword,
            name: &outline.name,
            description: outline.description.as_deref(),
            comments: &outline.comments,
        };
        let mut node =
            self.header_node(NodeType::ScenarioOutline, resource, &header, Some(parent))?;
        let template = OutlineTemplate {
            steps: steps(resource, &outline.steps, &node),
            examples: outline.examples.iter().map(examples_table).collect(),
            background: background_steps(resource, feature.background(), &node),
        };
        node.children = expand(&node, &template, &template.examples);
        node.outline = Some(Box::new(template));
        Ok(node)
    }
}

fn description_lines(description: Option<&str>) -> Vec<String> {
    description
        .map(|text| text.lines().map(|line| line.trim().to_string()).collect())
        .unwrap_or_default()
}

/// Flagged copies of the background steps for `parent`.
fn background_steps(
    resource: &str,
    background: Option<&Background>,
    parent: &PlanNode,
) -> Vec<PlanNode> {
    let Some(background) = background else {
        return Vec::new();
    };
    let properties = properties_from_comments(&background.comments, Some(&parent.properties));
    background
        .steps
        .iter()
        .map(|step| {
            let mut node = step_node(resource, step, &parent.language, &properties);
            node.background = true;
            node
        })
        .collect()
}

fn steps(resource: &str, steps: &[Step], parent: &PlanNode) -> Vec<PlanNode> {
    steps
        .iter()
        .map(|step| step_node(resource, step, &parent.language, &parent.properties))
        .collect()
}

fn step_node(
    resource: &str,
    step: &Step,
    language: &str,
    inherited: &BTreeMap<String, String>,
) -> PlanNode {
    let mut node = PlanNode::new(NodeType::Step, step.text.trim());
    node.keyword = step.keyword.trim().to_string();
    node.language = language.to_string();
    node.source = Some(Source::new(resource, step.location));
    node.properties = properties_from_comments(&step.comments, Some(inherited));
    node.data = step.argument.as_ref().map(|argument| match argument {
        StepArgument::DataTable(table) => StepData::DataTable(
            table
                .rows
                .iter()
                .map(|row| row.cells.iter().map(|cell| cell.value.trim().to_string()).collect())
                .collect(),
        ),
        StepArgument::DocString(doc) => StepData::Document {
            content: doc.content.clone(),
            content_type: doc.content_type.clone(),
        },
    });
    node
}

fn examples_table(examples: &Examples) -> ExamplesTable {
    ExamplesTable {
        tags: tag_names(&examples.tags),
        header: examples
            .header
            .as_ref()
            .map(TableRow::values)
            .unwrap_or_default(),
        rows: examples.body.iter().map(TableRow::values).collect(),
    }
}

#[cfg(test)]
mod tests;
