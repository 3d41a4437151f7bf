use crate::sql::parser::lexer::Token;

/// Abstract Syntax Tree (AST) node definitions for SQL statements
///
/// Names and literals stay as their tokens so the engine sees exactly what was lexed.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement; `columns` is `None` when no column list was written
    CreateTable {
        name: Token,
        columns: Option<Vec<ColumnDefinition>>,
    },
    /// INSERT statement; `values` is `None` when no VALUES clause was written
    Insert {
        table: Token,
        values: Option<Vec<Expression>>,
    },
    /// SELECT statement
    Select { from: Token, items: Vec<Expression> },
}

/// Column definition for CREATE TABLE statements
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: Token,
    /// Type name as written; checked by the engine, not the parser
    pub datatype: Token,
}

/// Expression types
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A single identifier, string or numeric token
    Literal(Token),
    /// Binary operation (`||` or `=`)
    Binary {
        left: Box<Expression>,
        op: Token,
        right: Box<Expression>,
    },
}

impl From<Token> for Expression {
    fn from(value: Token) -> Self {
        Self::Literal(value)
    }
}
