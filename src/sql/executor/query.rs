use log::warn;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::{ast::Expression, lexer::TokenKind},
    },
};

/// SELECT executor: full scan of one table with a column projection
pub struct Select {
    table_name: String,
    items: Vec<Expression>,
}

impl Select {
    pub fn new(table_name: String, items: Vec<Expression>) -> Box<Self> {
        Box::new(Self { table_name, items })
    }
}

impl<E: Engine> Executor<E> for Select {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table(&self.table_name)?;

        // The projection comes from the schema alone, so it is the same for every row
        // and is reported even when the table is empty
        let mut projection = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                Expression::Literal(token) if token.kind == TokenKind::Identifier => {
                    projection.push(table.get_col_index(&token.value)?);
                }
                Expression::Literal(token) => {
                    return Err(Error::ColumnNotFound(token.value.clone()));
                }
                Expression::Binary { .. } => {
                    warn!("skipping non-literal select item on table {}", table.name);
                }
            }
        }

        let columns = projection
            .iter()
            .map(|&i| (table.columns[i].datatype, table.columns[i].name.clone()))
            .collect();

        let mut rows = Vec::new();
        for cells in engine.scan_table(&table.name)? {
            let mut row = Vec::with_capacity(projection.len());
            for &i in &projection {
                let column = &table.columns[i];
                match cells.get(i) {
                    Some(Some(cell)) => row.push(cell.decode(column.datatype)?),
                    // Left empty by an insert that skipped a non-literal value
                    _ => {
                        return Err(Error::MissingCell {
                            table: table.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                }
            }
            rows.push(row);
        }

        Ok(ResultSet::Select { columns, rows })
    }
}
