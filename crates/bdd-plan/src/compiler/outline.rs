//! Concrete scenarios generated from an outline and examples tables.

use crate::node::{ExamplesTable, NodeType, OutlineTemplate, PlanNode};
use crate::placeholder::Row;

/// One scenario per body row of `examples`, numbered from 1 across all
/// blocks.
///
/// Each scenario takes its header from `outline`, loses the outline's id tag,
/// gains the tags of its examples block and receives the template
/// background followed by the template steps with placeholders substituted.
pub(crate) fn expand(
    outline: &PlanNode,
    template: &OutlineTemplate,
    examples: &[ExamplesTable],
) -> Vec<PlanNode> {
    examples
        .iter()
        .flat_map(|block| block.rows.iter().map(move |row| (block, row)))
        .enumerate()
        .map(|(index, (block, values))| {
            let number = index + 1;
            let row = Row::new(&block.header, values);
            let mut scenario = PlanNode::new(
                NodeType::Scenario,
                format!("{} [{number}]", outline.name),
            );
            scenario.id = outline.id.as_ref().map(|id| format!("{id}_{number}"));
            scenario.keyword.clone_from(&outline.keyword);
            scenario.language.clone_from(&outline.language);
            scenario.description.clone_from(&outline.description);
            scenario.properties.clone_from(&outline.properties);
            scenario.source.clone_from(&outline.source);
            scenario.add_tags(
                outline
                    .tags
                    .iter()
                    .filter(|tag| outline.id.as_ref() != Some(*tag))
                    .cloned(),
            );
            scenario.add_tags(block.tags.iter().cloned());
            scenario.children = template.background.clone();
            scenario
                .children
                .extend(template.steps.iter().map(|step| substitute(step, row)));
            scenario
        })
        .collect()
}

fn substitute(step: &PlanNode, row: Row<'_>) -> PlanNode {
    let mut concrete = step.clone();
    concrete.name = row.substitute(&step.name);
    concrete.data = step
        .data
        .as_ref()
        .map(|data| data.map_text(|text| row.substitute(text)));
    concrete
}
