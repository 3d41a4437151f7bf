//! SQL processing module
//!
//! This module provides:
//! - `parser`: SQL lexer and parser
//! - `types`: SQL data types and the cell codec
//! - `schema`: Table and column schema definitions
//! - `executor`: CREATE TABLE / INSERT / SELECT execution
//! - `engine`: Table store abstraction and sessions

pub mod parser;
pub mod types;
pub mod schema;
pub mod executor;
pub mod engine;
