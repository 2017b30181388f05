//! Line classification against the active dialect.
//!
//! The matcher is asked whether a line is a specific [`TokenType`]; the
//! grammar engine decides which types to try and in which order. Besides the
//! dialect, the matcher remembers the open doc-string separator so it can
//! recognise the matching close and strip the opening indentation from
//! content lines.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ast::Location;
use crate::dialect::Dialect;
use crate::errors::ParseError;
use crate::line::Line;
use crate::token::{Token, TokenType};

static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*language\s*:\s*([a-zA-Z\-_]+)\s*$")
        .unwrap_or_else(|_| unreachable!("language header regex is valid"))
});

const DOC_STRING_SEPARATORS: [&str; 2] = ["\"\"\"", "```"];

#[derive(Debug, Clone)]
pub(crate) struct TokenMatcher {
    dialect: &'static Dialect,
    doc_string_separator: Option<&'static str>,
    indent_to_remove: usize,
}

impl TokenMatcher {
    pub(crate) fn new(dialect: &'static Dialect) -> Self {
        Self {
            dialect,
            doc_string_separator: None,
            indent_to_remove: 0,
        }
    }

    /// Try to classify `line` as `kind`; `None` as line means end of input.
    ///
    /// Only a language header naming an unknown dialect fails.
    pub(crate) fn match_token(
        &mut self,
        kind: TokenType,
        line: Option<&Line<'_>>,
        eof: Location,
    ) -> Result<Option<Token>, ParseError> {
        let Some(line) = line else {
            return Ok((kind == TokenType::Eof).then(|| Token::new(kind, eof, self.dialect)));
        };
        let token = match kind {
            TokenType::Eof => None,
            TokenType::Empty => line
                .is_blank()
                .then(|| Token::new(kind, line.location(), self.dialect)),
            TokenType::Comment => self.match_comment(line),
            TokenType::Language => return self.match_language(line),
            TokenType::TagLine => self.match_tags(line),
            TokenType::FeatureLine => self.match_title(kind, line, self.dialect.feature_keywords()),
            TokenType::BackgroundLine => {
                self.match_title(kind, line, self.dialect.background_keywords())
            }
            TokenType::ScenarioLine => {
                self.match_title(kind, line, self.dialect.scenario_keywords())
            }
            TokenType::ScenarioOutlineLine => {
                self.match_title(kind, line, self.dialect.scenario_outline_keywords())
            }
            TokenType::ExamplesLine => {
                self.match_title(kind, line, self.dialect.examples_keywords())
            }
            TokenType::StepLine => self.match_step(line),
            TokenType::DocStringSeparator => self.match_doc_string_separator(line),
            TokenType::TableRow => self.match_table_row(line),
            TokenType::Other => Some(self.match_other(line)),
        };
        Ok(token)
    }

    fn match_comment(&self, line: &Line<'_>) -> Option<Token> {
        line.trimmed().starts_with('#').then(|| {
            Token::new(
                TokenType::Comment,
                Location::new(line.number(), 1),
                self.dialect,
            )
            .with_text(line.raw())
        })
    }

    fn match_language(&mut self, line: &Line<'_>) -> Result<Option<Token>, ParseError> {
        let Some(code) = LANGUAGE_RE
            .captures(line.raw())
            .and_then(|captures| captures.get(1))
            .map(|code| code.as_str())
        else {
            return Ok(None);
        };
        let dialect = Dialect::get(code).ok_or_else(|| ParseError::NoSuchLanguage {
            language: code.to_string(),
            location: line.location(),
        })?;
        debug!(language = dialect.code(), "switching feature dialect");
        self.dialect = dialect;
        Ok(Some(
            Token::new(TokenType::Language, line.location(), dialect).with_text(code),
        ))
    }

    fn match_tags(&self, line: &Line<'_>) -> Option<Token> {
        let tags = line.tags()?;
        Some(Token::new(TokenType::TagLine, line.location(), self.dialect).with_items(tags))
    }

    fn match_title(
        &self,
        kind: TokenType,
        line: &Line<'_>,
        keywords: &[&'static str],
    ) -> Option<Token> {
        keywords.iter().find_map(|keyword| {
            line.title_after(keyword).map(|title| {
                Token::new(kind, line.location(), self.dialect)
                    .with_keyword(keyword)
                    .with_text(title)
            })
        })
    }

    fn match_step(&self, line: &Line<'_>) -> Option<Token> {
        self.dialect.step_keywords().iter().find_map(|keyword| {
            line.trimmed().strip_prefix(keyword).map(|text| {
                Token::new(TokenType::StepLine, line.location(), self.dialect)
                    .with_keyword(keyword)
                    .with_text(text.trim())
            })
        })
    }

    fn match_doc_string_separator(&mut self, line: &Line<'_>) -> Option<Token> {
        if let Some(separator) = self.doc_string_separator {
            if !line.trimmed().starts_with(separator) {
                return None;
            }
            self.doc_string_separator = None;
            self.indent_to_remove = 0;
            return Some(
                Token::new(TokenType::DocStringSeparator, line.location(), self.dialect)
                    .with_keyword(separator),
            );
        }
        DOC_STRING_SEPARATORS.into_iter().find_map(|separator| {
            let content_type = line.trimmed().strip_prefix(separator)?.trim();
            self.doc_string_separator = Some(separator);
            self.indent_to_remove = line.indent();
            Some(
                Token::new(TokenType::DocStringSeparator, line.location(), self.dialect)
                    .with_keyword(separator)
                    .with_text(content_type),
            )
        })
    }

    fn match_table_row(&self, line: &Line<'_>) -> Option<Token> {
        let cells = line.table_cells()?;
        Some(Token::new(TokenType::TableRow, line.location(), self.dialect).with_items(cells))
    }

    fn match_other(&self, line: &Line<'_>) -> Token {
        let mut text = line.text_without_indent(self.indent_to_remove);
        if let Some(separator) = self.doc_string_separator {
            let escaped: String = separator.chars().flat_map(|ch| ['\\', ch]).collect();
            text = text.replace(&escaped, separator);
        }
        Token::new(
            TokenType::Other,
            Location::new(line.number(), 1),
            self.dialect,
        )
        .with_text(text)
    }
}
