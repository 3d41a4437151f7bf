use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::sql::parser::lexer::{Token, TokenKind};

pub mod cell;

pub use cell::Cell;

/// Supported SQL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    /// Maps a column type name as written in CREATE TABLE to a data type
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Integer),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataType::Integer => "int",
            DataType::Text => "text",
        })
    }
}

/// Runtime value; the variant is the value's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i32),
    Text(String),
}

impl Value {
    /// Creates a Value from a literal token.
    ///
    /// Numeric tokens become integers and string tokens become text; any other kind has
    /// no value. The parser only lets 32-bit integer numerics through, so a numeric token
    /// that does not parse here is a broken invariant.
    pub fn from_literal(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Numeric => Some(Self::Integer(token.value.parse().unwrap_or_else(|err| {
                panic!("numeric literal {} is not a 32-bit integer: {}", token.value, err)
            }))),
            TokenKind::String => Some(Self::Text(token.value.clone())),
            _ => None,
        }
    }

    pub fn datatype(&self) -> DataType {
        match self {
            Self::Integer(_) => DataType::Integer,
            Self::Text(_) => DataType::Text,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// A row is a vector of values
pub type Row = Vec<Value>;
