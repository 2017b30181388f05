//! Event-level coverage for the grammar automaton.

use rstest::rstest;

use super::*;
use crate::ast::Location;
use crate::token::TokenType;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Start(RuleType),
    Token(TokenType),
    End(RuleType),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Builder for Recorder {
    fn start_rule(&mut self, rule: RuleType) {
        self.events.push(Event::Start(rule));
    }

    fn build(&mut self, token: Token) {
        self.events.push(Event::Token(token.kind));
    }

    fn end_rule(&mut self, rule: RuleType) -> Result<(), ParseError> {
        self.events.push(Event::End(rule));
        Ok(())
    }
}

fn record(text: &str) -> Vec<Event> {
    let mut recorder = Recorder::default();
    drive(text, Dialect::english(), &mut recorder, &mut FailFast)
        .unwrap_or_else(|err| panic!("grammar rejected input: {err}"));
    recorder.events
}

fn first_error(text: &str) -> ParseError {
    let mut recorder = Recorder::default();
    match drive(text, Dialect::english(), &mut recorder, &mut FailFast) {
        Ok(()) => panic!("expected a grammar error for:\n{text}"),
        Err(err) => err,
    }
}

#[test]
fn empty_input_is_an_empty_document() {
    use Event::{End, Start, Token as Tok};
    assert_eq!(
        record(""),
        vec![
            Start(RuleType::Document),
            Tok(TokenType::Eof),
            End(RuleType::Document)
        ]
    );
}

#[test]
fn emits_nested_rules_for_a_scenario() {
    use Event::{End, Start, Token as Tok};
    let text = "\
@tag
Feature: F
  Scenario: S
    Given a
      | x |
";
    assert_eq!(
        record(text),
        vec![
            Start(RuleType::Document),
            Start(RuleType::Feature),
            Start(RuleType::FeatureHeader),
            Start(RuleType::Tags),
            Tok(TokenType::TagLine),
            End(RuleType::Tags),
            Tok(TokenType::FeatureLine),
            End(RuleType::FeatureHeader),
            Start(RuleType::ScenarioDefinition),
            Start(RuleType::Scenario),
            Tok(TokenType::ScenarioLine),
            Start(RuleType::Step),
            Tok(TokenType::StepLine),
            Start(RuleType::DataTable),
            Tok(TokenType::TableRow),
            End(RuleType::DataTable),
            End(RuleType::Step),
            End(RuleType::Scenario),
            End(RuleType::ScenarioDefinition),
            End(RuleType::Feature),
            Tok(TokenType::Eof),
            End(RuleType::Document),
        ]
    );
}

#[test]
fn tag_line_after_examples_table_belongs_to_next_examples() {
    let text = "\
Feature: F
  Scenario Outline: O
    Given <a>
    Examples:
      | a |
      | 1 |
    # second block
    @slow

    Examples:
      | a |
      | 2 |
";
    let events = record(text);
    let definitions = events
        .iter()
        .filter(|event| **event == Event::Start(RuleType::ExamplesDefinition))
        .count();
    assert_eq!(definitions, 2);
    let scenarios = events
        .iter()
        .filter(|event| **event == Event::Start(RuleType::ScenarioDefinition))
        .count();
    assert_eq!(scenarios, 1);
}

#[test]
fn tag_line_after_examples_table_can_start_a_scenario() {
    let text = "\
Feature: F
  Scenario Outline: O
    Given <a>
    Examples:
      | a |
      | 1 |
  @fast
  Scenario: S
";
    let events = record(text);
    let definitions = events
        .iter()
        .filter(|event| **event == Event::Start(RuleType::ScenarioDefinition))
        .count();
    assert_eq!(definitions, 2);
}

#[test]
fn description_collects_free_text() {
    let events = record("Feature: F\n  free text\n\n  more\n");
    let others = events
        .iter()
        .filter(|event| **event == Event::Token(TokenType::Other))
        .count();
    assert_eq!(others, 3);
    assert!(events.contains(&Event::Start(RuleType::Description)));
}

#[test]
fn reports_expected_tokens_for_unexpected_line() {
    let error = first_error("Feature: F\n  Scenario: S\n    Given a\n    Examples:\n");
    assert_eq!(
        error,
        ParseError::UnexpectedToken {
            location: Location::new(4, 5),
            expected: vec![
                TokenType::Eof,
                TokenType::Empty,
                TokenType::Comment,
                TokenType::TagLine,
                TokenType::ScenarioLine,
                TokenType::ScenarioOutlineLine,
                TokenType::StepLine,
                TokenType::DocStringSeparator,
                TokenType::TableRow,
            ],
            received: "Examples:".to_string(),
        }
    );
}

#[rstest]
#[case("Feature: F\n  Scenario Outline: O\n    Given <a>\n", 4)]
#[case("Feature: F\n  Scenario: S\n    Given a\n      \"\"\"\n      text\n", 6)]
#[case("@tag\n", 2)]
fn reports_unexpected_end_of_file(#[case] text: &str, #[case] line: usize) {
    let error = first_error(text);
    assert!(
        matches!(error, ParseError::UnexpectedEof { location, .. } if location.line == line),
        "unexpected error: {error}"
    );
}

#[test]
fn text_before_feature_is_rejected() {
    let error = first_error("hello\nFeature: F\n");
    assert!(matches!(
        error,
        ParseError::UnexpectedToken { location, .. } if location == Location::new(1, 1)
    ));
}

#[test]
fn language_header_is_only_recognised_before_the_feature() {
    let events = record("Feature: F\n# language: fr\n  Scenario: S\n");
    assert!(!events.contains(&Event::Token(TokenType::Language)));
    assert!(events.contains(&Event::Token(TokenType::Comment)));
}

#[test]
fn collecting_sink_continues_after_errors() {
    let text = "\
Feature: F
  Scenario: S
    Given a
    Examples:
    Then b
  Oops
";
    let mut recorder = Recorder::default();
    let mut sink = CollectErrors::default();
    drive(text, Dialect::english(), &mut recorder, &mut sink)
        .unwrap_or_else(|err| panic!("collecting sink never aborts: {err}"));
    assert_eq!(sink.errors().len(), 2);
    let steps = recorder
        .events
        .iter()
        .filter(|event| **event == Event::Token(TokenType::StepLine))
        .count();
    assert_eq!(steps, 2);
    assert_eq!(recorder.events.last(), Some(&Event::End(RuleType::Document)));
}

#[test]
fn collecting_sink_closes_open_rules_at_unexpected_eof() {
    let mut recorder = Recorder::default();
    let mut sink = CollectErrors::default();
    drive(
        "Feature: F\n  Scenario Outline: O\n    Given <a>\n",
        Dialect::english(),
        &mut recorder,
        &mut sink,
    )
    .unwrap_or_else(|err| panic!("collecting sink never aborts: {err}"));
    assert_eq!(sink.errors().len(), 1);
    let starts = recorder
        .events
        .iter()
        .filter(|event| matches!(event, Event::Start(_)))
        .count();
    let ends = recorder
        .events
        .iter()
        .filter(|event| matches!(event, Event::End(_)))
        .count();
    assert_eq!(starts, ends);
}
