use std::{fmt::Display, string::FromUtf8Error};

use bincode::ErrorKind;

use crate::sql::{parser::lexer::Location, types::DataType};

/// Custom Result type for minisql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for minisql
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No sub-lexer matched at `loc`; `hint` is the last token lexed before it
    Lex { loc: Location, hint: Option<String> },
    /// SQL parsing error
    Parse(String),
    /// Insert or select against an unknown table
    TableNotFound(String),
    /// Create table against an existing name while duplicates are rejected
    TableExists(String),
    /// Projection names a column the table does not have
    ColumnNotFound(String),
    /// Column declared with a type other than `int` or `text`
    InvalidDatatype(String),
    /// Insert value count differs from the table's column count
    MissingValues {
        table: String,
        expected: usize,
        found: usize,
    },
    /// Insert literal whose kind does not fit the target column
    TypeMismatch {
        column: String,
        expected: DataType,
        found: String,
    },
    /// Selected column of a stored row that never received a value
    MissingCell { table: String, column: String },
    /// Internal error (storage, serialization, corrupt cells)
    Internal(String),
}

impl From<Box<ErrorKind>> for Error {
    fn from(value: Box<ErrorKind>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<FromUtf8Error> for Error {
    fn from(value: FromUtf8Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Lex { loc, hint: Some(hint) } => {
                write!(f, "unable to lex tokens after {} at {}", hint, loc)
            }
            Error::Lex { loc, hint: None } => write!(f, "unable to lex tokens at {}", loc),
            Error::Parse(err) => write!(f, "parse error {}", err),
            Error::TableNotFound(name) => write!(f, "table {} does not exist", name),
            Error::TableExists(name) => write!(f, "table {} already exists", name),
            Error::ColumnNotFound(name) => write!(f, "column {} does not exist", name),
            Error::InvalidDatatype(name) => write!(f, "invalid datatype {}", name),
            Error::MissingValues {
                table,
                expected,
                found,
            } => write!(
                f,
                "missing values for table {}: expected {}, got {}",
                table, expected, found
            ),
            Error::TypeMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "column {} expects {} but got {} value",
                column, expected, found
            ),
            Error::MissingCell { table, column } => {
                write!(f, "a row of table {} has no value for column {}", table, column)
            }
            Error::Internal(err) => write!(f, "internal error {}", err),
        }
    }
}
