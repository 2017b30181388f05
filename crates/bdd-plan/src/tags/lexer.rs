//! Splits tag expressions into operators, parentheses and tag names.
//!
//! A tag is `@` followed by any run of characters other than whitespace and
//! parentheses, so ids such as `@ID-7` or `@#1` can be filtered on. The
//! stored name drops the `@`. Operators are case insensitive.

use super::ast::TagExprError;

#[derive(Clone, Debug)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    Tag(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
    End,
}

impl TokenKind {
    pub(super) fn describe(&self) -> String {
        match self {
            Self::Tag(tag) => format!("@{tag}"),
            Self::And => "'and'".to_string(),
            Self::Or => "'or'".to_string(),
            Self::Not => "'not'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::End => "<end>".to_string(),
        }
    }
}

pub(super) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn next_token(&mut self) -> Result<Token, TagExprError> {
        self.take_while(char::is_whitespace);
        let start = self.pos;
        let Some(ch) = self.bump_char() else {
            return Ok(Token {
                kind: TokenKind::End,
                start,
            });
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '@' => {
                let name = self.take_while(is_tag_char);
                if name.is_empty() {
                    return Err(TagExprError::new(start + 1, "expected tag name after '@'"));
                }
                TokenKind::Tag(name.to_string())
            }
            c if c.is_ascii_alphabetic() => {
                self.take_while(|c| c.is_ascii_alphabetic());
                let word = self.input.get(start..self.pos).unwrap_or_default();
                match word.to_ascii_lowercase().as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    _ => {
                        return Err(TagExprError::new(
                            start,
                            format!("unexpected identifier '{word}'"),
                        ));
                    }
                }
            }
            other => {
                return Err(TagExprError::new(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        Ok(Token { kind, start })
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume characters while `accept` holds and return them.
    fn take_while<P>(&mut self, accept: P) -> &'a str
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos;
        while self.peek_char().is_some_and(&accept) {
            self.bump_char();
        }
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

fn is_tag_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')')
}
