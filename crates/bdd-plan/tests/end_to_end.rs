//! Building plans from business and technical feature files.

use bdd_plan::{
    BACKGROUND_STEP_NAME, NodeType, Plan, PlanBuilder, PlanConfig, PlanError, PlanNode,
    RedefinitionConfig, RedefinitionError, VOID_STEP_NAME,
};
use rstest::rstest;

const BUSINESS: &str = include_str!("fixtures/business.feature");
const TECHNICAL: &str = include_str!("fixtures/technical.feature");

fn build(config: PlanConfig, sources: &[(&str, &str)]) -> Result<Plan, PlanError> {
    let mut builder = PlanBuilder::new(config)?;
    for (resource, text) in sources {
        builder.add_source(resource, text)?;
    }
    builder.build()
}

fn payments(config: PlanConfig) -> Plan {
    build(
        config,
        &[
            ("business.feature", BUSINESS),
            ("technical.feature", TECHNICAL),
        ],
    )
    .unwrap_or_else(|err| panic!("payments plan should build: {err}"))
}

fn names(node: &PlanNode) -> Vec<&str> {
    node.children.iter().map(|child| child.name.as_str()).collect()
}

fn scenario<'a>(plan: &'a Plan, name: &str) -> &'a PlanNode {
    plan.find(|node| node.node_type == NodeType::Scenario && node.name == name)
        .unwrap_or_else(|| panic!("scenario '{name}' should be in the plan"))
}

fn step<'a>(parent: &'a PlanNode, name: &str) -> &'a PlanNode {
    parent
        .children
        .iter()
        .find(|child| child.name == name)
        .unwrap_or_else(|| panic!("step '{name}' should be under '{}'", parent.name))
}

#[test]
fn implementation_features_are_removed() {
    let plan = payments(PlanConfig::default());
    assert_eq!(plan.len(), 1);
    let feature = plan.first().unwrap_or_else(|| panic!("feature"));
    assert_eq!(feature.name, "Payments");
    let mut tagged = 0;
    plan.walk(&mut |node| {
        if node.has_tag("implementation") {
            tagged += 1;
        }
    });
    assert_eq!(tagged, 0);
}

#[test]
fn scenario_steps_follow_the_step_map() {
    let plan = payments(PlanConfig::default());
    let pay = scenario(&plan, "Pay an invoice");
    assert_eq!(pay.id.as_deref(), Some("ID-PAY-1"));
    assert_eq!(
        names(pay),
        vec![
            BACKGROUND_STEP_NAME,
            "a registered customer",
            "an open invoice",
            "the customer pays it",
            "the invoice is closed",
        ]
    );
    assert_eq!(
        names(step(pay, "an open invoice")),
        vec!["a customer record", "an invoice record"]
    );
    assert_eq!(
        names(step(pay, "the customer pays it")),
        vec!["POST /payments is called"]
    );
    assert_eq!(
        names(step(pay, "the invoice is closed")),
        vec!["the invoice status is CLOSED"]
    );
}

#[test]
fn backgrounds_are_wrapped_and_voided() {
    let plan = payments(PlanConfig::default());
    let pay = scenario(&plan, "Pay an invoice");
    let wrapper = step(pay, BACKGROUND_STEP_NAME);
    assert_eq!(wrapper.node_type, NodeType::VirtualStep);
    assert!(wrapper.background);
    assert_eq!(names(wrapper), vec!["the API is up"]);
    let own = step(pay, "a registered customer");
    assert!(own.background);
    assert_eq!(names(own), vec![VOID_STEP_NAME]);
    assert_eq!(
        own.children.first().map(|child| child.node_type),
        Some(NodeType::VirtualStep)
    );
}

#[rstest]
#[case("Pay with a method [1]", "ID-PAY-2_1", "card")]
#[case("Pay with a method [2]", "ID-PAY-2_2", "wire")]
fn outlines_are_regenerated_from_business_examples(
    #[case] name: &str,
    #[case] id: &str,
    #[case] method: &str,
) {
    let plan = payments(PlanConfig::default());
    let concrete = scenario(&plan, name);
    assert_eq!(concrete.id.as_deref(), Some(id));
    let pays = step(concrete, &format!("the customer pays by {method}"));
    assert_eq!(
        names(pays),
        vec![format!("POST /payments is called with {method}")]
    );
    let receipt = step(concrete, &format!("the receipt says {method}"));
    assert_eq!(
        names(receipt),
        vec![format!("the receipt method is {method}")]
    );
    assert!(plan.find(|node| node.name.contains("ignored")).is_none());
}

#[test]
fn disabled_redefinition_keeps_both_features() {
    let redefinition = RedefinitionConfig {
        enabled: false,
        ..RedefinitionConfig::default()
    };
    let plan = payments(PlanConfig::default().with_redefinition(redefinition));
    assert_eq!(plan.len(), 2);
    let pay = scenario(&plan, "Pay an invoice");
    assert!(
        pay.children
            .iter()
            .all(|child| child.node_type == NodeType::Step && child.is_leaf())
    );
}

#[test]
fn tag_filter_runs_before_redefinition() {
    let plan = payments(PlanConfig::default().with_tag_filter("not @ID-PAY-2"));
    let feature = plan.first().unwrap_or_else(|| panic!("feature"));
    assert_eq!(names(feature), vec!["Pay an invoice"]);
}

#[test]
fn duplicate_implementations_are_rejected() {
    let result = build(
        PlanConfig::default(),
        &[
            ("business.feature", BUSINESS),
            ("technical.feature", TECHNICAL),
            ("again.feature", TECHNICAL),
        ],
    );
    match result {
        Err(PlanError::Redefinition(RedefinitionError::DuplicateId { id, tag, .. })) => {
            assert_eq!(id, "ID-PAY-2");
            assert_eq!(tag, "implementation");
        }
        other => panic!("expected a duplicate id error, got {other:?}"),
    }
}

#[test]
fn missing_implementation_names_the_definition() {
    let result = build(PlanConfig::default(), &[("business.feature", BUSINESS)]);
    let Err(err) = result else {
        panic!("expected a missing implementation error");
    };
    assert_eq!(
        err.to_string(),
        "problem in business.feature[7,3] '[ID-PAY-1] Scenario: Pay an invoice'\n\tNo implementation scenario with id 'ID-PAY-1'"
    );
}

#[test]
fn building_is_deterministic() {
    assert_eq!(
        payments(PlanConfig::default()),
        payments(PlanConfig::default())
    );
}

#[cfg(feature = "json")]
#[test]
fn serializes_merged_plan() {
    let plan = payments(PlanConfig::default());
    let output =
        bdd_plan::json::to_string(&plan).unwrap_or_else(|err| panic!("serialize: {err}"));
    let value: serde_json::Value =
        serde_json::from_str(&output).unwrap_or_else(|err| panic!("parse back: {err}"));
    let pay = &value["features"][0]["children"][0];
    assert_eq!(pay["node_type"], "SCENARIO");
    assert_eq!(pay["id"], "ID-PAY-1");
    assert_eq!(pay["source"], "business.feature[7,3]");
    let wrapper = &pay["children"][0];
    assert_eq!(wrapper["node_type"], "VIRTUAL_STEP");
    assert_eq!(wrapper["name"], BACKGROUND_STEP_NAME);
    assert_eq!(wrapper["background"], true);
    assert!(pay["children"][2].get("background").is_none());
}
