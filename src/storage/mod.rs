//! Byte-level key/value storage used underneath the SQL table store

pub mod engine;
pub mod memory;
