use log::debug;

use crate::{
    config::DuplicateTablePolicy,
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::ast::ColumnDefinition,
        schema::{Column, Table},
        types::DataType,
    },
};

/// CREATE TABLE executor
pub struct CreateTable {
    name: String,
    columns: Option<Vec<ColumnDefinition>>,
    on_duplicate: DuplicateTablePolicy,
}

impl CreateTable {
    pub fn new(
        name: String,
        columns: Option<Vec<ColumnDefinition>>,
        on_duplicate: DuplicateTablePolicy,
    ) -> Box<Self> {
        Box::new(Self {
            name,
            columns,
            on_duplicate,
        })
    }
}

impl<E: Engine> Executor<E> for CreateTable {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        // Every type is checked before anything is registered
        let columns = self
            .columns
            .unwrap_or_default()
            .into_iter()
            .map(|col| match DataType::from_type_name(&col.datatype.value) {
                Some(datatype) => Ok(Column::new(col.name.value, datatype)),
                None => Err(Error::InvalidDatatype(col.datatype.value)),
            })
            .collect::<Result<Vec<_>>>()?;

        if engine.get_table(&self.name)?.is_some() {
            match self.on_duplicate {
                DuplicateTablePolicy::Error => return Err(Error::TableExists(self.name)),
                DuplicateTablePolicy::Replace => {
                    debug!("replacing table {}, its rows are dropped", self.name)
                }
            }
        }

        engine.create_table(Table::new(self.name.clone(), columns))?;
        Ok(ResultSet::CreateTable {
            table_name: self.name,
        })
    }
}
