//! Number of implementation steps consumed by each definition step.

use derive_more::{Deref, From};
use tracing::warn;

use crate::error::RedefinitionError;
use crate::node::PlanNode;

/// Run length per definition step, in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From)]
pub(crate) struct StepMap(Vec<usize>);

impl StepMap {
    /// Every definition step consumes exactly one implementation step.
    pub(crate) fn one_to_one(definition_steps: usize) -> Self {
        Self(vec![1; definition_steps])
    }

    /// Step map declared on `implementation` under `property`.
    ///
    /// Missing entries consume nothing. A map that cannot be read falls back
    /// to one-to-one with a warning.
    pub(crate) fn resolve(
        implementation: &PlanNode,
        property: &str,
        definition_steps: usize,
    ) -> Result<Self, RedefinitionError> {
        let Some(raw) = implementation.properties.get(property) else {
            return Ok(Self::one_to_one(definition_steps));
        };
        let entries: Vec<&str> = raw.split('-').collect();
        if entries.len() > definition_steps {
            return Err(RedefinitionError::BadStepMap {
                locator: implementation.locator(),
                step_map: raw.clone(),
            });
        }
        let parsed: Result<Vec<usize>, _> =
            entries.iter().map(|entry| entry.trim().parse::<usize>()).collect();
        match parsed {
            Ok(mut runs) => {
                runs.resize(definition_steps, 0);
                Ok(Self(runs))
            }
            Err(err) => {
                warn!(
                    source = %implementation.locator(),
                    step_map = %raw,
                    error = %err,
                    "malformed step map; mapping steps one to one"
                );
                Ok(Self::one_to_one(definition_steps))
            }
        }
    }

    /// Run length for definition step `index`.
    pub(crate) fn run(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::LogLevel;
    use crate::node::NodeType;
    use crate::test_support::capture_logs;

    const KEY: &str = "redefinition.stepMap";

    fn implementation(step_map: Option<&str>) -> PlanNode {
        let mut node = PlanNode::new(NodeType::Scenario, "impl");
        if let Some(value) = step_map {
            node.properties.insert(KEY.to_string(), value.to_string());
        }
        node
    }

    #[rstest]
    #[case(None, 3, vec![1, 1, 1])]
    #[case(Some("2-1"), 2, vec![2, 1])]
    #[case(Some("3"), 3, vec![3, 0, 0])]
    #[case(Some("0-2"), 2, vec![0, 2])]
    #[case(Some("2-x"), 2, vec![1, 1])]
    #[case(Some(""), 2, vec![1, 1])]
    fn resolves_step_maps(
        #[case] raw: Option<&str>,
        #[case] definition_steps: usize,
        #[case] expected: Vec<usize>,
    ) {
        let map = StepMap::resolve(&implementation(raw), KEY, definition_steps)
            .unwrap_or_else(|err| panic!("step map should resolve: {err}"));
        assert_eq!(map, StepMap::from(expected));
    }

    #[test]
    fn rejects_more_entries_than_definition_steps() {
        let result = StepMap::resolve(&implementation(Some("1-1-1")), KEY, 2);
        assert_eq!(
            result,
            Err(RedefinitionError::BadStepMap {
                locator: "<synthetic>".to_string(),
                step_map: "1-1-1".to_string(),
            })
        );
    }

    #[test]
    fn malformed_map_is_reported() {
        let (map, logs) = capture_logs(LogLevel::Warn, || {
            StepMap::resolve(&implementation(Some("2-x")), KEY, 2)
        });
        assert_eq!(map, Ok(StepMap::one_to_one(2)));
        let warning = logs
            .lines()
            .find(|line| line.contains("malformed step map"))
            .unwrap_or_else(|| panic!("expected a step map warning in:\n{logs}"));
        assert!(warning.contains("WARN"));
        assert!(warning.contains("source=<synthetic>"));
        assert!(warning.contains("step_map=2-x"));
    }

    #[test]
    fn runs_past_the_end_are_empty() {
        let map = StepMap::one_to_one(2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.run(5), 0);
    }
}
