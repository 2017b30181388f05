//! Single-pass driver turning lines into builder events.

use super::state::{Block, State};
use super::{Builder, ErrorSink, RuleType};
use crate::ast::Location;
use crate::dialect::Dialect;
use crate::errors::ParseError;
use crate::line::Line;
use crate::matcher::TokenMatcher;
use crate::token::{Token, TokenType};

pub(super) struct Engine<'a, B: ?Sized, S: ?Sized> {
    matcher: TokenMatcher,
    builder: &'a mut B,
    sink: &'a mut S,
    open: Vec<RuleType>,
}

impl<'a, B, S> Engine<'a, B, S>
where
    B: Builder + ?Sized,
    S: ErrorSink + ?Sized,
{
    pub(super) fn new(dialect: &'static Dialect, builder: &'a mut B, sink: &'a mut S) -> Self {
        Self {
            matcher: TokenMatcher::new(dialect),
            builder,
            sink,
            open: Vec::new(),
        }
    }

    pub(super) fn run(mut self, text: &str) -> Result<(), ParseError> {
        let lines: Vec<Line<'_>> = text
            .lines()
            .enumerate()
            .map(|(index, raw)| Line::new(raw, index + 1))
            .collect();
        let eof = Location::new(lines.len() + 1, 1);
        self.start(RuleType::Document);
        let mut state = State::Start;
        let mut index = 0;
        while state != State::Done {
            let ahead = lines.get(index + 1..).unwrap_or_default();
            state = self.consume(state, lines.get(index), ahead, eof)?;
            index += 1;
        }
        Ok(())
    }

    fn consume(
        &mut self,
        state: State,
        line: Option<&Line<'_>>,
        ahead: &[Line<'_>],
        eof: Location,
    ) -> Result<State, ParseError> {
        let token = match self.classify(state, line, eof) {
            Ok(token) => token,
            Err(error) => {
                self.sink.report(error)?;
                return Ok(state);
            }
        };
        let Some(token) = token else {
            return self.reject(state, line, eof);
        };
        let examples_ahead = token.kind == TokenType::TagLine && self.examples_follow(ahead);
        match self.transition(state, token, examples_ahead)? {
            Some(next) => Ok(next),
            None => self.reject(state, line, eof),
        }
    }

    fn classify(
        &mut self,
        state: State,
        line: Option<&Line<'_>>,
        eof: Location,
    ) -> Result<Option<Token>, ParseError> {
        for kind in state.expected() {
            if let Some(token) = self.matcher.match_token(kind, line, eof)? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    fn reject(
        &mut self,
        state: State,
        line: Option<&Line<'_>>,
        eof: Location,
    ) -> Result<State, ParseError> {
        let expected = state.expected();
        if let Some(line) = line {
            self.sink.report(ParseError::UnexpectedToken {
                location: line.location(),
                expected,
                received: line.trimmed().trim_end().to_string(),
            })?;
            return Ok(state);
        }
        self.sink.report(ParseError::UnexpectedEof {
            location: eof,
            expected,
        })?;
        while !self.open.is_empty() {
            self.end()?;
        }
        Ok(State::Done)
    }

    /// Whether a tag line belongs to an examples block rather than to the
    /// next scenario. Only tags, comments and blank lines may sit between.
    fn examples_follow(&self, ahead: &[Line<'_>]) -> bool {
        let mut matcher = self.matcher.clone();
        let mut is = |kind: TokenType, line: &Line<'_>| {
            matches!(
                matcher.match_token(kind, Some(line), Location::default()),
                Ok(Some(_))
            )
        };
        for line in ahead {
            if is(TokenType::Empty, line) || is(TokenType::Comment, line) || is(TokenType::TagLine, line)
            {
                continue;
            }
            return is(TokenType::ExamplesLine, line);
        }
        false
    }

    fn transition(
        &mut self,
        state: State,
        token: Token,
        examples_ahead: bool,
    ) -> Result<Option<State>, ParseError> {
        use TokenType as T;
        let next = match (state, token.kind) {
            (_, T::Eof) => {
                self.close_to(RuleType::Document)?;
                self.shift(token);
                self.end()?;
                State::Done
            }
            (State::Start, T::Language) => {
                self.start(RuleType::Feature);
                self.start(RuleType::FeatureHeader);
                self.shift(token);
                State::HeaderLanguage
            }
            (State::Start, T::TagLine) => {
                self.start(RuleType::Feature);
                self.start(RuleType::FeatureHeader);
                self.start(RuleType::Tags);
                self.shift(token);
                State::HeaderTags
            }
            (State::HeaderLanguage, T::TagLine) => {
                self.start(RuleType::Tags);
                self.shift(token);
                State::HeaderTags
            }
            (State::Start | State::HeaderLanguage | State::HeaderTags, T::FeatureLine) => {
                if state == State::Start {
                    self.start(RuleType::Feature);
                    self.start(RuleType::FeatureHeader);
                }
                self.close_to(RuleType::FeatureHeader)?;
                self.shift(token);
                State::Title(Block::Feature)
            }
            (State::HeaderTags | State::ScenarioTags | State::ExamplesTags, T::TagLine)
            | (State::Description(_) | State::DocString(_), T::Other)
            | (State::DataTable(_) | State::ExamplesTable, T::TableRow)
            | (_, T::Empty) => {
                self.shift(token);
                state
            }
            (State::ScenarioTags, T::ScenarioLine) => {
                self.close_to(RuleType::ScenarioDefinition)?;
                self.start(RuleType::Scenario);
                self.shift(token);
                State::Title(Block::Scenario)
            }
            (State::ScenarioTags, T::ScenarioOutlineLine) => {
                self.close_to(RuleType::ScenarioDefinition)?;
                self.start(RuleType::ScenarioOutline);
                self.shift(token);
                State::Title(Block::Outline)
            }
            (State::ExamplesTags, T::ExamplesLine) => {
                self.close_to(RuleType::ExamplesDefinition)?;
                self.start(RuleType::Examples);
                self.shift(token);
                State::Title(Block::Examples)
            }
            (State::Title(block), T::Comment) => {
                self.shift(token);
                State::AfterDescription(block)
            }
            (State::Description(block), T::Comment) => {
                self.close_to(block.rule())?;
                self.shift(token);
                State::AfterDescription(block)
            }
            (_, T::Comment) => {
                self.shift(token);
                state
            }
            (State::Title(block), T::Other) => {
                self.start(RuleType::Description);
                self.shift(token);
                State::Description(block)
            }
            (State::Step(block), T::TableRow) => {
                self.start(RuleType::DataTable);
                self.shift(token);
                State::DataTable(block)
            }
            (State::Step(block), T::DocStringSeparator) => {
                self.start(RuleType::DocString);
                self.shift(token);
                State::DocString(block)
            }
            (State::DocString(block), T::DocStringSeparator) => {
                self.shift(token);
                self.end()?;
                State::AfterDocString(block)
            }
            _ => {
                return match state.block() {
                    Some(block) => self.follow(block, token, examples_ahead),
                    None => Ok(None),
                };
            }
        };
        Ok(Some(next))
    }

    /// Transitions shared by every state that ends a block.
    fn follow(
        &mut self,
        block: Block,
        token: Token,
        examples_ahead: bool,
    ) -> Result<Option<State>, ParseError> {
        use TokenType as T;
        let next = match token.kind {
            T::BackgroundLine => {
                self.close_to(RuleType::Feature)?;
                self.start(RuleType::Background);
                self.shift(token);
                State::Title(Block::Background)
            }
            T::TagLine if block == Block::Outline || (block == Block::Examples && examples_ahead) => {
                self.close_to(RuleType::ScenarioOutline)?;
                self.start(RuleType::ExamplesDefinition);
                self.start(RuleType::Tags);
                self.shift(token);
                State::ExamplesTags
            }
            T::TagLine => {
                self.close_to(RuleType::Feature)?;
                self.start(RuleType::ScenarioDefinition);
                self.start(RuleType::Tags);
                self.shift(token);
                State::ScenarioTags
            }
            T::ScenarioLine => {
                self.close_to(RuleType::Feature)?;
                self.start(RuleType::ScenarioDefinition);
                self.start(RuleType::Scenario);
                self.shift(token);
                State::Title(Block::Scenario)
            }
            T::ScenarioOutlineLine => {
                self.close_to(RuleType::Feature)?;
                self.start(RuleType::ScenarioDefinition);
                self.start(RuleType::ScenarioOutline);
                self.shift(token);
                State::Title(Block::Outline)
            }
            T::StepLine => {
                self.close_to(block.rule())?;
                self.start(RuleType::Step);
                self.shift(token);
                State::Step(block)
            }
            T::ExamplesLine => {
                self.close_to(RuleType::ScenarioOutline)?;
                self.start(RuleType::ExamplesDefinition);
                self.start(RuleType::Examples);
                self.shift(token);
                State::Title(Block::Examples)
            }
            T::TableRow => {
                self.close_to(RuleType::Examples)?;
                self.start(RuleType::ExamplesTable);
                self.shift(token);
                State::ExamplesTable
            }
            _ => return Ok(None),
        };
        Ok(Some(next))
    }

    fn start(&mut self, rule: RuleType) {
        self.builder.start_rule(rule);
        self.open.push(rule);
    }

    fn shift(&mut self, token: Token) {
        self.builder.build(token);
    }

    fn end(&mut self) -> Result<(), ParseError> {
        let Some(rule) = self.open.pop() else {
            return Ok(());
        };
        match self.builder.end_rule(rule) {
            Ok(()) => Ok(()),
            Err(error) => self.sink.report(error),
        }
    }

    /// Close open rules until `rule` is the innermost one.
    fn close_to(&mut self, rule: RuleType) -> Result<(), ParseError> {
        while self.open.last().is_some_and(|open| *open != rule) {
            self.end()?;
        }
        Ok(())
    }
}
