use crate::{
    config::Config,
    error::Result,
    sql::{
        engine::Engine,
        executor::{mutation::Insert, query::Select, schema::CreateTable},
        parser::ast::Statement,
        types::{DataType, Row},
    },
};

mod mutation;
mod query;
mod schema;

/// SQL executor trait
pub trait Executor<E: Engine> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet>;
}

/// Builds an executor from a parsed statement
impl<E: Engine + 'static> dyn Executor<E> {
    pub fn build(stmt: Statement, config: &Config) -> Box<dyn Executor<E>> {
        match stmt {
            Statement::CreateTable { name, columns } => {
                CreateTable::new(name.value, columns, config.duplicate_table)
            }
            Statement::Insert { table, values } => Insert::new(table.value, values),
            Statement::Select { from, items } => Select::new(from.value, items),
        }
    }
}

/// Execution result set
///
/// Owns its data, so later changes to the store never show up in it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    CreateTable { table_name: String },
    Insert { count: usize },
    /// Projected columns as (type, name) and one value per projected column in each row
    Select {
        columns: Vec<(DataType, String)>,
        rows: Vec<Row>,
    },
}
