//! Recursive-descent parser over the lexer's token stream.

use super::ast::{Expr, TagExprError};
use super::lexer::{Lexer, Token, TokenKind};

/// Binary operators by increasing precedence.
#[derive(Clone, Copy)]
enum Binary {
    Or,
    And,
}

impl Binary {
    fn matches(self, kind: &TokenKind) -> bool {
        match self {
            Self::Or => *kind == TokenKind::Or,
            Self::And => *kind == TokenKind::And,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }

    fn build(self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            Self::Or => Expr::Or(Box::new(lhs), Box::new(rhs)),
            Self::And => Expr::And(Box::new(lhs), Box::new(rhs)),
        }
    }
}

pub(super) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Result<Self, TagExprError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    pub(super) fn parse_expression(&mut self) -> Result<Expr, TagExprError> {
        self.parse_binary(Binary::Or)
    }

    pub(super) fn expect_end(&self) -> Result<(), TagExprError> {
        if self.current.kind == TokenKind::End {
            Ok(())
        } else {
            Err(TagExprError::new(
                self.current.start,
                format!("unexpected token {}", self.current.kind.describe()),
            ))
        }
    }

    fn advance(&mut self) -> Result<(), TagExprError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Left-associative chain of `op`, with operands one level tighter.
    fn parse_binary(&mut self, op: Binary) -> Result<Expr, TagExprError> {
        let mut node = self.parse_operand(op)?;
        while op.matches(&self.current.kind) {
            self.advance()?;
            if matches!(
                self.current.kind,
                TokenKind::Or | TokenKind::And | TokenKind::RParen | TokenKind::End
            ) {
                return Err(TagExprError::new(
                    self.current.start,
                    format!("expected tag or '(' after '{}'", op.name()),
                ));
            }
            let rhs = self.parse_operand(op)?;
            node = op.build(node, rhs);
        }
        Ok(node)
    }

    fn parse_operand(&mut self, op: Binary) -> Result<Expr, TagExprError> {
        match op {
            Binary::Or => self.parse_binary(Binary::And),
            Binary::And => self.parse_not(),
        }
    }

    fn parse_not(&mut self) -> Result<Expr, TagExprError> {
        if self.current.kind == TokenKind::Not {
            self.advance()?;
            let operand = self.parse_not()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, TagExprError> {
        let Token { kind, start } = self.current.clone();
        match kind {
            TokenKind::Tag(tag) => {
                self.advance()?;
                Ok(Expr::Tag(tag))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                if self.current.kind != TokenKind::RParen {
                    return Err(TagExprError::new(start, "missing ')'"));
                }
                self.advance()?;
                Ok(expr)
            }
            TokenKind::End => Err(TagExprError::new(start, "expected tag or '('")),
            other => Err(TagExprError::new(
                start,
                format!("expected tag or '(' but found {}", other.describe()),
            )),
        }
    }
}
