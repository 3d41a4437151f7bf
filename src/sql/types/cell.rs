//! Byte encoding of stored values
//!
//! Integers are stored as 4 big-endian bytes and text as its raw UTF-8 bytes. Cells
//! carry no length or type prefix: the owning column's declared type is what decides
//! how a cell is read back.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{DataType, Value};

const INTEGER_WIDTH: usize = 4;

/// One stored row/column value in its untyped byte form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell(#[serde(with = "serde_bytes")] Vec<u8>);

impl Cell {
    pub fn encode(value: &Value) -> Self {
        match value {
            Value::Integer(i) => {
                let mut buf = vec![0; INTEGER_WIDTH];
                BigEndian::write_i32(&mut buf, *i);
                Self(buf)
            }
            Value::Text(s) => Self(s.as_bytes().to_vec()),
        }
    }

    /// Reads the cell back as a value of the given column type
    pub fn decode(&self, datatype: DataType) -> Result<Value> {
        match datatype {
            DataType::Integer => {
                if self.0.len() != INTEGER_WIDTH {
                    return Err(Error::Internal(format!(
                        "integer cell must be {} bytes, found {}",
                        INTEGER_WIDTH,
                        self.0.len()
                    )));
                }
                Ok(Value::Integer(BigEndian::read_i32(&self.0)))
            }
            DataType::Text => Ok(Value::Text(String::from_utf8(self.0.clone())?)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
