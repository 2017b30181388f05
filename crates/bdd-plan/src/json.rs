//! JSON writer for compiled plans.
//!
//! The writer serializes a borrowed view of the plan tree. Node types are
//! upper case and empty optional fields are omitted so the output stays
//! compact for large plans.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::node::{Plan, PlanNode, StepData};

#[derive(Serialize)]
struct JsonPlan<'a> {
    features: Vec<JsonNode<'a>>,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    node_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    background: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonData<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonData<'a> {
    DataTable {
        rows: &'a [Vec<String>],
    },
    Document {
        content: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<&'a str>,
    },
}

impl<'a> From<&'a Plan> for JsonPlan<'a> {
    fn from(plan: &'a Plan) -> Self {
        Self {
            features: plan.features.iter().map(JsonNode::from).collect(),
        }
    }
}

impl<'a> From<&'a PlanNode> for JsonNode<'a> {
    fn from(node: &'a PlanNode) -> Self {
        Self {
            node_type: node.node_type.as_str(),
            id: node.id.as_deref(),
            name: &node.name,
            keyword: non_empty(&node.keyword),
            language: non_empty(&node.language),
            description: (!node.description.is_empty()).then_some(node.description.as_slice()),
            tags: (!node.tags.is_empty()).then_some(node.tags.as_slice()),
            properties: (!node.properties.is_empty()).then_some(&node.properties),
            source: node.source.as_ref().map(ToString::to_string),
            background: node.background,
            data: node.data.as_ref().map(JsonData::from),
            children: node.children.iter().map(Self::from).collect(),
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

impl<'a> From<&'a StepData> for JsonData<'a> {
    fn from(data: &'a StepData) -> Self {
        match data {
            StepData::DataTable(rows) => Self::DataTable { rows },
            StepData::Document {
                content,
                content_type,
            } => Self::Document {
                content,
                content_type: content_type.as_deref(),
            },
        }
    }
}

/// Serialize `plan` into the supplied writer.
///
/// # Examples
/// ```rust
/// use bdd_plan::{Plan, PlanBuilder, PlanConfig, json};
///
/// let mut builder = PlanBuilder::new(PlanConfig::default()).unwrap();
/// builder
///     .add_source("pay.feature", "Feature: Pay\n  Scenario: Card\n    Given a card\n")
///     .unwrap();
/// let plan: Plan = builder.build().unwrap();
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &plan).unwrap();
/// let output = String::from_utf8(buffer).unwrap();
/// assert!(output.contains("\"node_type\":\"SCENARIO\""));
/// ```
///
/// # Errors
/// Returns an error when serialization or writing fails.
pub fn write<W: Write>(writer: &mut W, plan: &Plan) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonPlan::from(plan))
}

/// Produce a JSON string representation of `plan`.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string(plan: &Plan) -> serde_json::Result<String> {
    serde_json::to_string(&JsonPlan::from(plan))
}

/// Produce an indented JSON string representation of `plan`.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string_pretty(plan: &Plan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonPlan::from(plan))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::node::{NodeType, Source};

    fn plan() -> Plan {
        let mut step = PlanNode::new(NodeType::Step, "a table");
        step.keyword = "Given".to_string();
        step.data = Some(StepData::DataTable(vec![vec!["a".to_string()]]));
        let mut scenario = PlanNode::new(NodeType::Scenario, "S");
        scenario.id = Some("ID-1".to_string());
        scenario.tags = vec!["ID-1".to_string()];
        scenario.source = Some(Source {
            resource: "f.feature".to_string(),
            line: 2,
            column: 3,
        });
        scenario.children.push(step);
        scenario.children.push(PlanNode::virtual_step("void"));
        let mut feature = PlanNode::new(NodeType::Feature, "F");
        feature.children.push(scenario);
        Plan {
            features: vec![feature],
        }
    }

    #[test]
    fn writes_tree_shape() {
        let output = to_string(&plan()).unwrap_or_else(|err| panic!("serialize: {err}"));
        let value: Value =
            serde_json::from_str(&output).unwrap_or_else(|err| panic!("parse back: {err}"));
        assert_eq!(
            value,
            json!({
                "features": [{
                    "node_type": "FEATURE",
                    "name": "F",
                    "children": [{
                        "node_type": "SCENARIO",
                        "id": "ID-1",
                        "name": "S",
                        "tags": ["ID-1"],
                        "source": "f.feature[2,3]",
                        "children": [
                            {
                                "node_type": "STEP",
                                "name": "a table",
                                "keyword": "Given",
                                "data": {"kind": "data_table", "rows": [["a"]]}
                            },
                            {"node_type": "VIRTUAL_STEP", "name": "void"}
                        ]
                    }]
                }]
            })
        );
    }

    #[test]
    fn writer_matches_string_output() {
        let plan = plan();
        let mut buffer = Vec::new();
        write(&mut buffer, &plan).unwrap_or_else(|err| panic!("write: {err}"));
        let written = String::from_utf8(buffer).unwrap_or_else(|err| panic!("utf8: {err}"));
        let direct = to_string(&plan).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(written, direct);
    }
}
