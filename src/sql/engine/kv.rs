use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    sql::{schema::Table, types::Cell},
    storage::engine::Engine as StorageEngine,
};

use super::Engine;

/// Key-value store backed table store
///
/// Table schemas and rows are serialized with bincode into the underlying storage
/// engine.
pub struct KVEngine<S: StorageEngine> {
    storage: S,
}

impl<S: StorageEngine> KVEngine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Removes every stored row of a table and restarts its row sequence
    fn drop_rows(&mut self, table_name: &str) -> Result<()> {
        let prefix = KeyPrefix::Row(table_name.to_string()).encode()?;
        for (key, _) in self.storage.scan_prefix(&prefix)? {
            self.storage.delete(&key)?;
        }
        self.storage
            .delete(&Key::NextRow(table_name.to_string()).encode()?)
    }
}

impl<S: StorageEngine> Engine for KVEngine<S> {
    fn create_table(&mut self, table: Table) -> Result<()> {
        self.drop_rows(&table.name)?;
        debug!("storing table {} with {} columns", table.name, table.columns.len());

        let key = Key::Table(table.name.clone()).encode()?;
        let value = bincode::serialize(&table)?;
        self.storage.set(key, value)
    }

    fn get_table(&self, table_name: &str) -> Result<Option<Table>> {
        let key = Key::Table(table_name.to_string()).encode()?;
        Ok(self
            .storage
            .get(&key)?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    fn list_tables(&self) -> Result<Vec<Table>> {
        let mut tables = self
            .storage
            .scan_prefix(&KeyPrefix::Table.encode()?)?
            .into_iter()
            .map(|(_, v)| Ok(bincode::deserialize::<Table>(&v)?))
            .collect::<Result<Vec<_>>>()?;
        // Keys sort by name length first, so order by name here
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    fn create_row(&mut self, table_name: &str, row: Vec<Option<Cell>>) -> Result<()> {
        let seq_key = Key::NextRow(table_name.to_string()).encode()?;
        let seq: u64 = match self.storage.get(&seq_key)? {
            Some(value) => bincode::deserialize(&value)?,
            None => 0,
        };
        self.storage.set(seq_key, bincode::serialize(&(seq + 1))?)?;

        let key = Key::Row(table_name.to_string(), seq.to_be_bytes().to_vec()).encode()?;
        self.storage.set(key, bincode::serialize(&row)?)
    }

    fn scan_table(&self, table_name: &str) -> Result<Vec<Vec<Option<Cell>>>> {
        let prefix = KeyPrefix::Row(table_name.to_string()).encode()?;
        self.storage
            .scan_prefix(&prefix)?
            .into_iter()
            .map(|(_, v)| Ok(bincode::deserialize(&v)?))
            .collect()
    }
}

/// Key types for KV storage operations
///
/// Row positions are stored big-endian so that byte order of the keys is insertion
/// order.
#[derive(Debug, Serialize, Deserialize)]
enum Key {
    Table(String),
    Row(String, #[serde(with = "serde_bytes")] Vec<u8>),
    NextRow(String),
}

impl Key {
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

/// Key prefix types for prefix scanning
///
/// In bincode, enums are serialized as [variant_index][variant_data...].
/// Variant indices must line up with `Key`.
#[derive(Debug, Serialize, Deserialize)]
enum KeyPrefix {
    Table,
    Row(String),
}

impl KeyPrefix {
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::KVEngine;
    use crate::{
        error::Result,
        sql::{
            engine::Engine,
            schema::{Column, Table},
            types::{Cell, DataType, Value},
        },
        storage::memory::MemoryEngine,
    };

    fn int_row(n: i32) -> Vec<Option<Cell>> {
        vec![Some(Cell::encode(&Value::Integer(n)))]
    }

    #[test]
    fn test_rows_keep_insertion_order() -> Result<()> {
        let mut kv = KVEngine::new(MemoryEngine::new());
        kv.create_table(Table::new("t", vec![Column::new("a", DataType::Integer)]))?;
        for n in 0..300 {
            kv.create_row("t", int_row(n))?;
        }

        let values = kv
            .scan_table("t")?
            .iter()
            .map(|row| row[0].as_ref().map(|c| c.decode(DataType::Integer)).transpose())
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            values,
            (0..300).map(|n| Some(Value::Integer(n))).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_tables_do_not_share_rows() -> Result<()> {
        let mut kv = KVEngine::new(MemoryEngine::new());
        kv.create_table(Table::new("a", vec![Column::new("x", DataType::Integer)]))?;
        kv.create_table(Table::new("ab", vec![Column::new("x", DataType::Integer)]))?;
        kv.create_row("a", int_row(1))?;
        kv.create_row("ab", int_row(2))?;
        kv.create_row("ab", int_row(3))?;

        assert_eq!(kv.scan_table("a")?, vec![int_row(1)]);
        assert_eq!(kv.scan_table("ab")?, vec![int_row(2), int_row(3)]);
        assert!(kv.scan_table("b")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_create_table_replaces() -> Result<()> {
        let mut kv = KVEngine::new(MemoryEngine::new());
        kv.create_table(Table::new("t", vec![Column::new("a", DataType::Integer)]))?;
        kv.create_row("t", int_row(1))?;

        let replacement = Table::new("t", vec![Column::new("b", DataType::Text)]);
        kv.create_table(replacement.clone())?;
        assert_eq!(kv.get_table("t")?, Some(replacement));
        assert!(kv.scan_table("t")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_tables() -> Result<()> {
        let mut kv = KVEngine::new(MemoryEngine::new());
        assert!(kv.list_tables()?.is_empty());
        kv.create_table(Table::new("users", vec![]))?;
        kv.create_table(Table::new("b", vec![]))?;
        kv.create_row("b", vec![])?;

        let names = kv
            .list_tables()?
            .into_iter()
            .map(|t| t.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["b".to_string(), "users".to_string()]);
        Ok(())
    }
}
