use log::warn;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::ast::Expression,
        types::{Cell, Value},
    },
};

/// INSERT executor
pub struct Insert {
    table_name: String,
    values: Option<Vec<Expression>>,
}

impl Insert {
    pub fn new(table_name: String, values: Option<Vec<Expression>>) -> Box<Self> {
        Box::new(Self { table_name, values })
    }
}

impl<E: Engine> Executor<E> for Insert {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;
        let Some(values) = self.values else {
            return Ok(ResultSet::Insert { count: 0 });
        };

        if values.len() != table.columns.len() {
            return Err(Error::MissingValues {
                table: table.name,
                expected: table.columns.len(),
                found: values.len(),
            });
        }

        // The whole row is checked before anything is written; a skipped value keeps its
        // slot so later cells stay under their own column
        let mut row = Vec::with_capacity(values.len());
        for (expr, column) in values.iter().zip(&table.columns) {
            let Expression::Literal(token) = expr else {
                warn!(
                    "skipping non-literal value for column {} of table {}",
                    column.name, table.name
                );
                row.push(None);
                continue;
            };

            let value = Value::from_literal(token).ok_or_else(|| Error::TypeMismatch {
                column: column.name.clone(),
                expected: column.datatype,
                found: token.kind.to_string(),
            })?;
            if value.datatype() != column.datatype {
                return Err(Error::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.datatype,
                    found: value.datatype().to_string(),
                });
            }
            row.push(Some(Cell::encode(&value)));
        }

        engine.create_row(&table.name, row)?;
        Ok(ResultSet::Insert { count: 1 })
    }
}
