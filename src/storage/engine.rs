use std::ops::{Bound, RangeBounds};

use crate::error::Result;

/// Key/value pair as stored
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Abstract storage engine interface (byte-level operations)
///
/// Different from `sql::engine::Engine`, which operates on tables. Keys are kept in
/// byte order, so scans return entries sorted by key.
pub trait Engine {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn delete(&mut self, key: &[u8]) -> Result<()>;
    fn scan(&self, range: impl RangeBounds<Vec<u8>>) -> Result<Vec<KeyValue>>;

    /// Prefix scan using lexicographic ordering
    ///
    /// The prefix ["ab"] becomes the range ["ab", "ac"). Trailing 0xff bytes cannot be
    /// incremented and are dropped first; an all-0xff prefix scans to the end.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        let start = Bound::Included(prefix.to_vec());
        let mut upper = prefix.to_vec();
        while upper.last() == Some(&0xff) {
            upper.pop();
        }
        let end = match upper.last_mut() {
            Some(last) => {
                *last += 1;
                Bound::Excluded(upper)
            }
            None => Bound::Unbounded,
        };
        self.scan((start, end))
    }
}
