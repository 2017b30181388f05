//! Automaton states and the token types each one accepts.

use super::RuleType;
use crate::token::TokenType;

/// Order in which token types are tried against a line.
///
/// Blank lines win over everything, language headers over plain comments,
/// and `Other` catches whatever is left.
const MATCH_ORDER: [TokenType; 14] = [
    TokenType::Eof,
    TokenType::Empty,
    TokenType::Language,
    TokenType::Comment,
    TokenType::TagLine,
    TokenType::FeatureLine,
    TokenType::BackgroundLine,
    TokenType::ScenarioLine,
    TokenType::ScenarioOutlineLine,
    TokenType::ExamplesLine,
    TokenType::StepLine,
    TokenType::DocStringSeparator,
    TokenType::TableRow,
    TokenType::Other,
];

/// Construct whose title, description and children are being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Block {
    Feature,
    Background,
    Scenario,
    Outline,
    Examples,
}

impl Block {
    /// Rule that owns the block's steps or rows.
    pub(super) fn rule(self) -> RuleType {
        match self {
            Self::Feature => RuleType::FeatureHeader,
            Self::Background => RuleType::Background,
            Self::Scenario => RuleType::Scenario,
            Self::Outline => RuleType::ScenarioOutline,
            Self::Examples => RuleType::Examples,
        }
    }

    /// Token types that may follow the block's description.
    fn follows(self, kind: TokenType) -> bool {
        use TokenType as T;
        match self {
            Self::Feature => matches!(
                kind,
                T::Eof | T::TagLine | T::BackgroundLine | T::ScenarioLine | T::ScenarioOutlineLine
            ),
            Self::Background | Self::Scenario => matches!(
                kind,
                T::Eof | T::TagLine | T::ScenarioLine | T::ScenarioOutlineLine | T::StepLine
            ),
            Self::Outline => matches!(kind, T::TagLine | T::ExamplesLine | T::StepLine),
            Self::Examples => matches!(
                kind,
                T::Eof
                    | T::TagLine
                    | T::ScenarioLine
                    | T::ScenarioOutlineLine
                    | T::ExamplesLine
                    | T::TableRow
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    Start,
    HeaderLanguage,
    HeaderTags,
    ScenarioTags,
    ExamplesTags,
    Title(Block),
    Description(Block),
    AfterDescription(Block),
    Step(Block),
    DataTable(Block),
    DocString(Block),
    AfterDocString(Block),
    ExamplesTable,
    Done,
}

impl State {
    /// Block whose follow set applies in this state.
    pub(super) fn block(self) -> Option<Block> {
        match self {
            Self::Title(block)
            | Self::Description(block)
            | Self::AfterDescription(block)
            | Self::Step(block)
            | Self::DataTable(block)
            | Self::DocString(block)
            | Self::AfterDocString(block) => Some(block),
            Self::ExamplesTable => Some(Block::Examples),
            Self::Start
            | Self::HeaderLanguage
            | Self::HeaderTags
            | Self::ScenarioTags
            | Self::ExamplesTags
            | Self::Done => None,
        }
    }

    pub(super) fn accepts(self, kind: TokenType) -> bool {
        use TokenType as T;
        let filler = matches!(kind, T::Empty | T::Comment);
        match self {
            Self::Start => filler || matches!(kind, T::Eof | T::Language | T::TagLine | T::FeatureLine),
            Self::HeaderLanguage | Self::HeaderTags => {
                filler || matches!(kind, T::TagLine | T::FeatureLine)
            }
            Self::ScenarioTags => {
                filler || matches!(kind, T::TagLine | T::ScenarioLine | T::ScenarioOutlineLine)
            }
            Self::ExamplesTags => filler || matches!(kind, T::TagLine | T::ExamplesLine),
            Self::Title(block) => filler || kind == T::Other || block.follows(kind),
            Self::Description(block) => {
                matches!(kind, T::Comment | T::Other) || block.follows(kind)
            }
            Self::AfterDescription(block) | Self::AfterDocString(block) => {
                filler || block.follows(kind)
            }
            Self::Step(block) => {
                filler
                    || matches!(kind, T::TableRow | T::DocStringSeparator)
                    || block.follows(kind)
            }
            Self::DataTable(block) => filler || kind == T::TableRow || block.follows(kind),
            Self::DocString(_) => matches!(kind, T::DocStringSeparator | T::Other),
            Self::ExamplesTable => filler || Block::Examples.follows(kind),
            Self::Done => false,
        }
    }

    /// Accepted token types in matching order.
    pub(super) fn expected(self) -> Vec<TokenType> {
        MATCH_ORDER
            .into_iter()
            .filter(|kind| self.accepts(*kind))
            .collect()
    }
}
