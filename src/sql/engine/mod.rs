use log::debug;

use crate::{
    config::Config,
    error::{Error, Result},
    sql::{
        executor::{Executor, ResultSet},
        parser::{Parser, ast::Statement},
        schema::Table,
        types::Cell,
    },
};

pub mod kv;

/// SQL table store trait
///
/// Holds table schemas and their rows as encoded cells, one slot per column; `None` marks
/// a value that was never written. Executors only ever talk to the
/// store through this trait, so any byte-level storage can sit underneath it.
pub trait Engine {
    /// Stores a table definition. An existing table with the same name is replaced and
    /// its rows are dropped.
    fn create_table(&mut self, table: Table) -> Result<()>;
    fn get_table(&self, table_name: &str) -> Result<Option<Table>>;
    /// Returns every table definition, ordered by name
    fn list_tables(&self) -> Result<Vec<Table>>;
    /// Appends a row after the table's existing rows
    fn create_row(&mut self, table_name: &str, row: Vec<Option<Cell>>) -> Result<()>;
    /// Returns all rows of a table in insertion order
    fn scan_table(&self, table_name: &str) -> Result<Vec<Vec<Option<Cell>>>>;

    /// Returns table info, returns error if table doesn't exist
    fn must_get_table(&self, table_name: &str) -> Result<Table> {
        self.get_table(table_name)?
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }
}

/// SQL session for executing statements
///
/// The session owns its store; two sessions never share tables.
pub struct Session<E: Engine> {
    engine: E,
    config: Config,
}

impl<E: Engine + 'static> Session<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, Config::default())
    }

    pub fn with_config(engine: E, config: Config) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Executes every statement in `sql` in order, stopping at the first failure.
    /// Statements that ran before the failure keep their effects.
    pub fn execute(&mut self, sql: &str) -> Result<Vec<ResultSet>> {
        Parser::new(sql)
            .parse()?
            .into_iter()
            .map(|stmt| self.execute_statement(stmt))
            .collect()
    }

    /// Executes a single parsed statement
    pub fn execute_statement(&mut self, stmt: Statement) -> Result<ResultSet> {
        debug!("executing {:?}", stmt);
        <dyn Executor<E>>::build(stmt, &self.config).execute(&mut self.engine)
    }
}
