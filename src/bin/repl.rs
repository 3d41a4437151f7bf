use anyhow::Result;
use clap::{Parser as ClapParser, Subcommand};
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use tracing_subscriber::EnvFilter;

use minisql::{
    Config, DuplicateTablePolicy, KVEngine, MemoryEngine, ResultSet, Session,
    sql::{engine::Engine, parser::Parser},
};

const HISTORY_FILE: &str = ".minisql_history";
const PROMPT: &str = "# ";

#[derive(ClapParser)]
#[command(author, version, about = "minisql - an in-memory SQL shell")]
struct Cli {
    /// What to do when CREATE TABLE names an existing table (replace or error)
    #[arg(long, default_value_t = DuplicateTablePolicy::Replace)]
    on_duplicate_table: DuplicateTablePolicy,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell,

    /// Execute SQL directly
    Query {
        /// One or more `;`-separated statements
        query: String,
    },
}

type Db = Session<KVEngine<MemoryEngine>>;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::default().with_duplicate_table(cli.on_duplicate_table);
    let mut db = Session::with_config(KVEngine::new(MemoryEngine::new()), config);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(&mut db),
        Commands::Query { query } => {
            if !run_line(&mut db, &query) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn run_shell(db: &mut Db) -> Result<()> {
    println!("Welcome to minisql. Type 'help' for assistance or 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !matches!(err, ReadlineError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound) {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" => break,
                    "help" => print_help(),
                    "tables" => match db.engine().list_tables() {
                        Ok(tables) => {
                            for table in tables {
                                println!("{}", format_table_info(&table));
                            }
                        }
                        Err(err) => println!("Error: {}", err),
                    },
                    _ => {
                        run_line(db, line);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

/// Runs every statement on the line, stopping at the first error. Returns false if one
/// failed.
fn run_line(db: &mut Db, line: &str) -> bool {
    let statements = match Parser::new(line).parse() {
        Ok(statements) => statements,
        Err(err) => {
            println!("Error: {}", err);
            return false;
        }
    };

    for stmt in statements {
        match db.execute_statement(stmt) {
            Ok(result) => print!("{}", format_result(&result)),
            Err(err) => {
                println!("Error: {}", err);
                return false;
            }
        }
    }
    true
}

fn print_help() {
    println!("Available commands:");
    println!("  CREATE TABLE <name> (<col> int|text, ...)  - Create or redefine a table");
    println!("  INSERT INTO <table> VALUES (<v>, ...)      - Append a row to a table");
    println!("  SELECT <col>, ... FROM <table>             - Read columns of every row");
    println!();
    println!("Other commands:");
    println!("  tables                                     - List tables and their columns");
    println!("  help                                       - Display this help message");
    println!("  exit                                       - Exit the shell");
}

fn format_table_info(table: &minisql::sql::schema::Table) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.datatype))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", table.name, columns)
}

fn format_result(result: &ResultSet) -> String {
    let (columns, rows) = match result {
        ResultSet::CreateTable { .. } | ResultSet::Insert { .. } => return "ok\n".to_string(),
        ResultSet::Select { columns, rows } => (columns, rows),
    };

    let rows = rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    // Minimum width of 3 per column
    let mut widths = columns
        .iter()
        .map(|(_, name)| name.len().max(3))
        .collect::<Vec<_>>();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.len());
            }
        }
    }

    let mut out = String::new();
    out.push('|');
    for ((_, name), width) in columns.iter().zip(&widths) {
        out.push_str(&format!(" {:<width$} |", name, width = width));
    }
    out.push('\n');

    out.push('+');
    for width in &widths {
        out.push_str(&format!("{:-<width$}+", "", width = width + 2));
    }
    out.push('\n');

    for row in &rows {
        out.push('|');
        for (value, width) in row.iter().zip(&widths) {
            out.push_str(&format!(" {:<width$} |", value, width = width));
        }
        out.push('\n');
    }

    let n = rows.len();
    out.push_str(&format!("({} {})\n", n, if n == 1 { "row" } else { "rows" }));
    out
}
