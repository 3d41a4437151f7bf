use std::iter::Peekable;

use crate::error::{Error, Result};
use crate::sql::parser::ast::{ColumnDefinition, Expression, Statement};
use crate::sql::parser::lexer::{Keyword, Lexer, Symbol, Token, TokenKind};

pub mod ast;
pub mod lexer;

/// SQL Parser - Converts tokens into Abstract Syntax Tree (AST)
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input).peekable(),
        }
    }

    /// Parses every `;`-separated statement in the input
    pub fn parse(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.next_if_symbol(Symbol::Semicolon).is_some() {}
            if self.peek()?.is_none() {
                break;
            }
            statements.push(self.parse_statement()?);

            match self.peek()? {
                None => break,
                Some(token) if token.is_symbol(Symbol::Semicolon) => {}
                Some(token) => return Err(unexpected(&token)),
            }
        }
        Ok(statements)
    }

    /// Parses a statement based on the first token
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek()? {
            Some(t) if t.is_keyword(Keyword::Create) => self.parse_create_table(),
            Some(t) if t.is_keyword(Keyword::Insert) => self.parse_insert(),
            Some(t) if t.is_keyword(Keyword::Select) => self.parse_select(),
            Some(t) => Err(unexpected(&t)),
            None => Err(end_of_input()),
        }
    }

    /// Parses CREATE TABLE statement
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.next_expect_keyword(Keyword::Create)?;
        self.next_expect_keyword(Keyword::Table)?;
        let name = self.next_ident()?;

        if self.next_if_symbol(Symbol::OpenParen).is_none() {
            return Ok(Statement::CreateTable {
                name,
                columns: None,
            });
        }

        let mut columns = Vec::new();
        loop {
            columns.push(ColumnDefinition {
                name: self.next_ident()?,
                datatype: self.next_datatype()?,
            });
            if self.next_if_symbol(Symbol::Comma).is_none() {
                break;
            }
        }
        self.next_expect_symbol(Symbol::CloseParen)?;

        Ok(Statement::CreateTable {
            name,
            columns: Some(columns),
        })
    }

    /// Parses INSERT statement
    fn parse_insert(&mut self) -> Result<Statement> {
        self.next_expect_keyword(Keyword::Insert)?;
        self.next_expect_keyword(Keyword::Into)?;
        let table = self.next_ident()?;

        if self.next_if(|t| t.is_keyword(Keyword::Values)).is_none() {
            return Ok(Statement::Insert {
                table,
                values: None,
            });
        }

        self.next_expect_symbol(Symbol::OpenParen)?;
        let values = self.parse_expressions()?;
        self.next_expect_symbol(Symbol::CloseParen)?;

        Ok(Statement::Insert {
            table,
            values: Some(values),
        })
    }

    /// Parses SELECT statement: `SELECT expr [, expr]* FROM table`
    fn parse_select(&mut self) -> Result<Statement> {
        self.next_expect_keyword(Keyword::Select)?;
        let items = self.parse_expressions()?;
        self.next_expect_keyword(Keyword::From)?;
        let from = self.next_ident()?;

        if let Some(token) = self.next_if(|t| t.is_keyword(Keyword::Where)) {
            return Err(Error::Parse(format!(
                "[Parser] WHERE clauses are not supported (at {})",
                token.loc
            )));
        }
        Ok(Statement::Select { from, items })
    }

    /// Parses a comma-separated list of at least one expression
    fn parse_expressions(&mut self) -> Result<Vec<Expression>> {
        let mut exprs = vec![self.parse_expression()?];
        while self.next_if_symbol(Symbol::Comma).is_some() {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    /// Parses a literal optionally chained with `||` or `=` (left-associative)
    fn parse_expression(&mut self) -> Result<Expression> {
        let mut expr = self.parse_literal()?;
        while let Some(op) =
            self.next_if(|t| t.is_symbol(Symbol::Concat) || t.is_symbol(Symbol::Equal))
        {
            let right = self.parse_literal()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_literal(&mut self) -> Result<Expression> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Identifier | TokenKind::String => Ok(token.into()),
            // Only 32-bit integers can be stored, so other numerics stop here
            TokenKind::Numeric => match token.value.parse::<i32>() {
                Ok(_) => Ok(token.into()),
                Err(_) => Err(Error::Parse(format!(
                    "[Parser] Numeric literal {} at {} is not a 32-bit integer",
                    token, token.loc
                ))),
            },
            _ => Err(unexpected(&token)),
        }
    }

    /// Peeks at the next token
    fn peek(&mut self) -> Result<Option<Token>> {
        self.lexer.peek().cloned().transpose()
    }

    /// Consumes and returns the next token
    fn next(&mut self) -> Result<Token> {
        self.lexer.next().unwrap_or_else(|| Err(end_of_input()))
    }

    /// Expects and consumes an identifier
    fn next_ident(&mut self) -> Result<Token> {
        match self.next()? {
            token if token.kind == TokenKind::Identifier => Ok(token),
            token => Err(Error::Parse(format!(
                "[Parser] Expected ident, got token {} at {}",
                token, token.loc
            ))),
        }
    }

    /// Expects a column type name; `int`/`text` lex as keywords, anything else as an ident
    fn next_datatype(&mut self) -> Result<Token> {
        match self.next()? {
            token if matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) => Ok(token),
            token => Err(Error::Parse(format!(
                "[Parser] Expected column type, got token {} at {}",
                token, token.loc
            ))),
        }
    }

    fn next_expect_keyword(&mut self, expect: Keyword) -> Result<()> {
        let token = self.next()?;
        if !token.is_keyword(expect) {
            return Err(Error::Parse(format!(
                "[Parser] Expected keyword {}, got {} at {}",
                expect, token, token.loc
            )));
        }
        Ok(())
    }

    fn next_expect_symbol(&mut self, expect: Symbol) -> Result<()> {
        let token = self.next()?;
        if !token.is_symbol(expect) {
            return Err(Error::Parse(format!(
                "[Parser] Expected token {}, got {} at {}",
                expect, token, token.loc
            )));
        }
        Ok(())
    }

    /// Consumes next token if it satisfies the predicate
    fn next_if<F: Fn(&Token) -> bool>(&mut self, predicate: F) -> Option<Token> {
        self.peek().unwrap_or(None).filter(|t| predicate(t))?;
        self.next().ok()
    }

    fn next_if_symbol(&mut self, symbol: Symbol) -> Option<Token> {
        self.next_if(|t| t.is_symbol(symbol))
    }
}

fn unexpected(token: &Token) -> Error {
    Error::Parse(format!(
        "[Parser] Unexpected token {} at {}",
        token, token.loc
    ))
}

fn end_of_input() -> Error {
    Error::Parse("[Parser] Unexpected end of input".to_string())
}
