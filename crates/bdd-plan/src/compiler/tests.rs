//! Compilation coverage from feature text to plan nodes.

use rstest::rstest;

use super::*;

const CHECKOUT: &str = "\
# owner: web
@web @ID-CHK
Feature: Checkout
  Customers pay
    for their basket.

  Background:
    Given a signed-in customer

  # tier: 1
  @ID-CHK-1 @smoke # fast path
  Scenario: Pay by card
    # timeout: 5
    When the customer pays
      | card | amount |
      | visa | 10     |
    Then a receipt is issued

  @ID-CHK-2
  Scenario Outline: Apply <code>
    When the voucher <code> is applied
      \"\"\"json
      {\"code\": \"<code>\", \"other\": \"<missing>\"}
      \"\"\"
    Then the customer pays <due>

    Examples:
      | code   | due |
      | SPRING | 9   |
      | SUMMER | 18  |

    @legacy
    Examples:
      | due | code |
      | 5   | OLD  |
";

fn compile_with(config: &PlanConfig, text: &str) -> Result<Option<PlanNode>, PlanError> {
    let document =
        bdd_plan_gherkin::parse(text).unwrap_or_else(|err| panic!("text should parse: {err}"));
    PlanCompiler::new(config)
        .unwrap_or_else(|err| panic!("config should be valid: {err}"))
        .compile("checkout.feature", &document)
}

fn compile(text: &str) -> PlanNode {
    compile_with(&PlanConfig::default(), text)
        .unwrap_or_else(|err| panic!("text should compile: {err}"))
        .unwrap_or_else(|| panic!("feature should survive"))
}

fn names(nodes: &[PlanNode]) -> Vec<String> {
    nodes.iter().map(|node| node.name.clone()).collect()
}

#[test]
fn compiles_feature_header() {
    let feature = compile(CHECKOUT);
    assert_eq!(feature.node_type, NodeType::Feature);
    assert_eq!(feature.id.as_deref(), Some("ID-CHK"));
    assert_eq!(feature.keyword, "Feature");
    assert_eq!(feature.language, "en");
    assert_eq!(feature.tags, vec!["web", "ID-CHK"]);
    assert_eq!(feature.description, vec!["Customers pay", "for their basket."]);
    assert_eq!(
        feature.source.as_ref().map(ToString::to_string).as_deref(),
        Some("checkout.feature[3,1]")
    );
    assert_eq!(feature.properties.get("owner").map(String::as_str), Some("web"));
    assert_eq!(feature.properties.get("language").map(String::as_str), Some("en"));
}

#[test]
fn prepends_flagged_background_steps() {
    let feature = compile(CHECKOUT);
    let Some(scenario) = feature.child(0) else {
        panic!("expected a scenario");
    };
    assert_eq!(scenario.node_type, NodeType::Scenario);
    assert_eq!(scenario.id.as_deref(), Some("ID-CHK-1"));
    assert_eq!(
        names(&scenario.children),
        vec!["a signed-in customer", "the customer pays", "a receipt is issued"]
    );
    let flags: Vec<_> = scenario.children.iter().map(|step| step.background).collect();
    assert_eq!(flags, vec![true, false, false]);
    assert_eq!(
        scenario.child(1).map(|step| step.keyword.as_str()),
        Some("When")
    );
}

#[test]
fn inherits_tags_and_properties() {
    let feature = compile(CHECKOUT);
    let Some(scenario) = feature.child(0) else {
        panic!("expected a scenario");
    };
    assert_eq!(scenario.tags, vec!["web", "ID-CHK", "ID-CHK-1", "smoke"]);
    assert_eq!(scenario.properties.get("owner").map(String::as_str), Some("web"));
    assert_eq!(scenario.properties.get("tier").map(String::as_str), Some("1"));
    let Some(step) = scenario.child(1) else {
        panic!("expected a step");
    };
    assert_eq!(step.properties.get("tier").map(String::as_str), Some("1"));
    assert_eq!(step.properties.get("timeout").map(String::as_str), Some("5"));
    assert_eq!(
        step.data,
        Some(StepData::DataTable(vec![
            vec!["card".to_string(), "amount".to_string()],
            vec!["visa".to_string(), "10".to_string()],
        ]))
    );
}

#[test]
fn expands_outlines_across_examples_blocks() {
    let feature = compile(CHECKOUT);
    let Some(outline) = feature.child(1) else {
        panic!("expected an outline");
    };
    assert_eq!(outline.node_type, NodeType::ScenarioOutline);
    assert_eq!(outline.name, "Apply <code>");
    assert_eq!(
        names(&outline.children),
        vec!["Apply <code> [1]", "Apply <code> [2]", "Apply <code> [3]"]
    );
    let ids: Vec<_> = outline.children.iter().map(|s| s.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            Some("ID-CHK-2_1".to_string()),
            Some("ID-CHK-2_2".to_string()),
            Some("ID-CHK-2_3".to_string())
        ]
    );
    let Some(third) = outline.child(2) else {
        panic!("expected a third scenario");
    };
    assert_eq!(
        names(&third.children),
        vec![
            "a signed-in customer",
            "the voucher OLD is applied",
            "the customer pays 5"
        ]
    );
    assert_eq!(third.tags, vec!["web", "ID-CHK", "legacy"]);
    assert_eq!(
        third.child(1).and_then(|step| step.data.clone()),
        Some(StepData::Document {
            content: "{\"code\": \"OLD\", \"other\": \"<missing>\"}".to_string(),
            content_type: Some("json".to_string()),
        })
    );
}

#[test]
fn keeps_outline_template() {
    let feature = compile(CHECKOUT);
    let Some(template) = feature.child(1).and_then(|outline| outline.outline.as_deref()) else {
        panic!("outline should keep its template");
    };
    assert_eq!(
        names(&template.steps),
        vec!["the voucher <code> is applied", "the customer pays <due>"]
    );
    assert_eq!(template.examples.len(), 2);
    assert_eq!(template.background.len(), 1);
    assert_eq!(
        template.examples.get(1).map(|block| block.tags.clone()),
        Some(vec!["legacy".to_string()])
    );
}

#[test]
fn configured_id_pattern_selects_tags() {
    let config = PlanConfig::default().with_id_tag_pattern(r"#\d+");
    let feature = compile_with(
        &config,
        "Feature: F\n  @#1 @definition\n  Scenario: S\n    Given a\n",
    )
    .unwrap_or_else(|err| panic!("{err}"))
    .unwrap_or_else(|| panic!("feature should survive"));
    assert_eq!(feature.id, None);
    assert_eq!(feature.child(0).and_then(|s| s.id.clone()).as_deref(), Some("#1"));
}

#[test]
fn disabled_id_pattern_leaves_nodes_without_ids() {
    let config = PlanConfig::default().with_id_tag_pattern("");
    let feature = compile_with(&config, CHECKOUT)
        .unwrap_or_else(|err| panic!("{err}"))
        .unwrap_or_else(|| panic!("feature should survive"));
    let mut ids = 0;
    feature.walk(&mut |node| ids += usize::from(node.id.is_some()));
    assert_eq!(ids, 0);
}

#[test]
fn rejects_two_id_tags_on_one_element() {
    let result = compile_with(
        &PlanConfig::default(),
        "Feature: F\n  @ID-1 @ID-2\n  Scenario: S\n    Given a\n",
    );
    match result {
        Err(PlanError::AmbiguousId { name, locator, tags }) => {
            assert_eq!(name, "S");
            assert_eq!(locator, "checkout.feature[3,3]");
            assert_eq!(tags, vec!["ID-1", "ID-2"]);
        }
        other => panic!("expected an ambiguous id error, got {other:?}"),
    }
}

#[rstest]
#[case("@smoke", vec!["Pay by card"])]
#[case("not @smoke", vec!["Apply <code>"])]
#[case("@web and not @wip", vec!["Pay by card", "Apply <code>"])]
fn tag_filter_selects_scenarios(#[case] filter: &str, #[case] expected: Vec<&str>) {
    let config = PlanConfig::default().with_tag_filter(filter);
    let feature = compile_with(&config, CHECKOUT)
        .unwrap_or_else(|err| panic!("{err}"))
        .unwrap_or_else(|| panic!("feature should survive"));
    assert_eq!(names(&feature.children), expected);
}

#[test]
fn feature_without_selected_scenarios_is_dropped() {
    let config = PlanConfig::default().with_tag_filter("@nightly");
    let result = compile_with(&config, CHECKOUT).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(result, None);
}

#[test]
fn documents_without_feature_compile_to_nothing() {
    let result = compile_with(&PlanConfig::default(), "# nothing\n")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(result, None);
}

#[test]
fn localised_features_record_their_language() {
    let feature = compile(
        "# language: es\nCaracterística: Pagos\n  Escenario: Pagar\n    Dado un saldo\n",
    );
    assert_eq!(feature.language, "es");
    assert_eq!(feature.properties.get("language").map(String::as_str), Some("es"));
    assert_eq!(
        feature.child(0).and_then(|s| s.child(0)).map(|step| step.language.as_str()),
        Some("es")
    );
}

#[rstest]
#[case(PlanConfig::default().with_id_tag_pattern("ID-("))]
#[case(PlanConfig::default().with_tag_filter("@a and"))]
fn rejects_invalid_settings(#[case] config: PlanConfig) {
    let result = PlanCompiler::new(&config);
    assert!(matches!(
        result,
        Err(PlanError::InvalidIdPattern { .. } | PlanError::InvalidTagFilter { .. })
    ));
}
