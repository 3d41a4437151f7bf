use std::{collections::BTreeMap, ops::RangeBounds};

use crate::{
    error::Result,
    storage::engine::{Engine, KeyValue},
};

/// In-memory storage engine
#[derive(Debug, Default)]
pub struct MemoryEngine {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MemoryEngine {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.data.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn scan(&self, range: impl RangeBounds<Vec<u8>>) -> Result<Vec<KeyValue>> {
        Ok(self
            .data
            .range(range)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
