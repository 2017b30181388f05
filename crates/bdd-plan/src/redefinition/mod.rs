//! Merges definition scenarios with the implementation scenarios sharing
//! their id.
//!
//! A definition scenario is written for business readers; its
//! implementation restates it in technical steps. After merging, every
//! definition step owns the run of implementation steps that realise it and
//! the implementation scenarios are removed from the plan.

mod step_map;

use std::collections::HashMap;

use tracing::{debug, debug_span, warn};

use self::step_map::StepMap;
use crate::compiler::expand;
use crate::config::RedefinitionConfig;
use crate::error::RedefinitionError;
use crate::node::{NodeType, Plan, PlanNode};

/// Name of the virtual step wrapping implementation background steps.
pub const BACKGROUND_STEP_NAME: &str = "<background>";
/// Name of the virtual step given to definition steps left without
/// implementation.
pub const VOID_STEP_NAME: &str = "void";

/// Position of a scenario or outline: feature index, child index.
type Address = (usize, usize);

/// Rewrites a compiled plan according to a [`RedefinitionConfig`].
#[derive(Debug, Clone)]
pub struct Redefiner {
    config: RedefinitionConfig,
}

impl Redefiner {
    /// Redefiner applying `config`.
    #[must_use]
    pub fn new(config: RedefinitionConfig) -> Self {
        Self { config }
    }

    /// Merge every definition scenario and outline of `plan` with its
    /// implementation, then drop implementation nodes.
    ///
    /// Does nothing when redefinition is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`RedefinitionError`] on duplicate ids, missing
    /// implementations and malformed step maps. The plan may be partially
    /// rewritten when an error is returned.
    pub fn redefine(&self, plan: &mut Plan) -> Result<(), RedefinitionError> {
        if !self.config.enabled {
            return Ok(());
        }
        let _span = debug_span!("redefine").entered();
        let definition = &self.config.definition_tag;
        let implementation = &self.config.implementation_tag;

        let implementation_outlines = collect(plan, NodeType::ScenarioOutline, implementation)?;
        for address in implementation_outlines.values() {
            if let Some(outline) = node_mut(plan, *address) {
                outline.children.clear();
            }
        }

        let implementations = collect(plan, NodeType::Scenario, implementation)?;
        for (id, address) in ordered(collect(plan, NodeType::Scenario, definition)?) {
            let Some(source) = implementations.get(&id).and_then(|at| node(plan, *at)).cloned()
            else {
                let missing = node(plan, address);
                return Err(RedefinitionError::MissingImplementation {
                    id,
                    locator: missing.map(PlanNode::locator).unwrap_or_default(),
                    name: missing.map(PlanNode::display_name).unwrap_or_default(),
                });
            };
            if let Some(target) = node_mut(plan, address) {
                self.merge(target, &source)?;
            }
        }

        for (id, address) in ordered(collect(plan, NodeType::ScenarioOutline, definition)?) {
            let Some(source) = implementation_outlines
                .get(&id)
                .and_then(|at| node(plan, *at))
                .cloned()
            else {
                let missing = node(plan, address);
                return Err(RedefinitionError::MissingOutlineImplementation {
                    id,
                    locator: missing.map(PlanNode::locator).unwrap_or_default(),
                    name: missing.map(PlanNode::display_name).unwrap_or_default(),
                });
            };
            if let Some(target) = node_mut(plan, address) {
                self.merge_outline(target, &source)?;
            }
        }

        remove_tagged(plan, implementation);
        Ok(())
    }

    /// Regenerate the implementation outline from the definition's examples
    /// and merge the concrete scenarios pairwise.
    fn merge_outline(
        &self,
        definition: &mut PlanNode,
        implementation: &PlanNode,
    ) -> Result<(), RedefinitionError> {
        let examples = definition
            .outline
            .as_ref()
            .map(|template| template.examples.clone())
            .unwrap_or_default();
        let template = implementation
            .outline
            .as_deref()
            .cloned()
            .unwrap_or_default();
        let regenerated = expand(implementation, &template, &examples);
        for (target, source) in definition.children.iter_mut().zip(&regenerated) {
            self.merge(target, source)?;
        }
        Ok(())
    }

    /// Rebuild the steps of `definition` around those of `implementation`.
    fn merge(
        &self,
        definition: &mut PlanNode,
        implementation: &PlanNode,
    ) -> Result<(), RedefinitionError> {
        let (definition_background, definition_steps): (Vec<PlanNode>, Vec<PlanNode>) =
            definition.children.drain(..).partition(|step| step.background);
        let (implementation_background, implementation_steps): (Vec<&PlanNode>, Vec<&PlanNode>) =
            implementation.children.iter().partition(|step| step.background);

        let mut children = Vec::new();
        if !implementation_background.is_empty() {
            let mut wrapper = PlanNode::virtual_step(BACKGROUND_STEP_NAME);
            wrapper.background = true;
            wrapper.children = implementation_background.into_iter().cloned().collect();
            children.push(wrapper);
        }
        children.extend(definition_background);

        let step_map = StepMap::resolve(
            implementation,
            &self.config.step_map_property,
            definition_steps.len(),
        )?;
        let mut visited = 0;
        for (index, mut step) in definition_steps.into_iter().enumerate() {
            let run = step_map.run(index);
            step.children.extend(
                implementation_steps
                    .iter()
                    .skip(visited)
                    .take(run)
                    .map(|&node| node.clone()),
            );
            visited += run;
            children.push(step);
        }

        let leftovers: Vec<PlanNode> = implementation_steps
            .iter()
            .skip(visited)
            .map(|&node| node.clone())
            .collect();
        if !leftovers.is_empty() {
            let Some(last) = children.last_mut() else {
                return Err(RedefinitionError::NoDefinitionSteps {
                    locator: definition.locator(),
                    name: definition.display_name(),
                });
            };
            last.children.extend(leftovers);
        }

        for step in &mut children {
            if step.is_leaf() {
                step.children.push(PlanNode::virtual_step(VOID_STEP_NAME));
            }
        }
        definition.children = children;
        debug!(
            definition = %definition.display_name(),
            implementation = %implementation.locator(),
            "merged redefined scenario"
        );
        Ok(())
    }
}

fn node(plan: &Plan, (feature, index): Address) -> Option<&PlanNode> {
    plan.features.get(feature)?.children.get(index)
}

fn node_mut(plan: &mut Plan, (feature, index): Address) -> Option<&mut PlanNode> {
    plan.features.get_mut(feature)?.children.get_mut(index)
}

/// Scenarios or outlines of `node_type` carrying `tag`, keyed by id.
///
/// Nodes without an id are skipped with a warning; a repeated id is an
/// error naming both nodes.
fn collect(
    plan: &Plan,
    node_type: NodeType,
    tag: &str,
) -> Result<HashMap<String, Address>, RedefinitionError> {
    let mut found: HashMap<String, Address> = HashMap::new();
    for (feature_index, feature) in plan.features.iter().enumerate() {
        for (index, candidate) in feature.children.iter().enumerate() {
            if candidate.node_type != node_type || !candidate.has_tag(tag) {
                continue;
            }
            let Some(id) = &candidate.id else {
                warn!(
                    source = %candidate.locator(),
                    name = %candidate.display_name(),
                    "scenario not having a unique id; it will be ignored"
                );
                continue;
            };
            if let Some(existing) = found.get(id).and_then(|at| node(plan, *at)) {
                return Err(RedefinitionError::DuplicateId {
                    id: id.clone(),
                    tag: tag.to_string(),
                    source_a: candidate.locator(),
                    name_a: candidate.display_name(),
                    source_b: existing.locator(),
                    name_b: existing.display_name(),
                });
            }
            found.insert(id.clone(), (feature_index, index));
        }
    }
    Ok(found)
}

/// Entries in plan order.
fn ordered(found: HashMap<String, Address>) -> Vec<(String, Address)> {
    let mut entries: Vec<_> = found.into_iter().collect();
    entries.sort_by_key(|(_, address)| *address);
    entries
}

/// Drop every node carrying `tag`, then features left without children.
fn remove_tagged(plan: &mut Plan, tag: &str) {
    fn prune(nodes: &mut Vec<PlanNode>, tag: &str) {
        nodes.retain(|node| !node.has_tag(tag));
        for node in nodes {
            prune(&mut node.children, tag);
        }
    }
    prune(&mut plan.features, tag);
    plan.features.retain(|feature| !feature.is_leaf());
}
