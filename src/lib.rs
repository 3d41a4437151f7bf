//! minisql - A minimal relational query engine in Rust
//!
//! This crate provides:
//! - SQL tokenizing (longest-match lexer with source positions)
//! - Statement parsing (CREATE TABLE, INSERT, SELECT)
//! - A typed cell codec and an in-memory table store
//! - Statement execution through an explicit `Session`

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;

pub use config::{Config, DuplicateTablePolicy};
pub use error::{Error, Result};
pub use sql::engine::{Session, kv::KVEngine};
pub use sql::executor::ResultSet;
pub use storage::memory::MemoryEngine;
