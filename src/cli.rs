//! CLI for schema management.

use crate::db::{Connection, DbPath, Schema};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// ht — Personal Health Tracker schema utility
#[derive(Parser)]
#[command(name = "ht")]
#[command(about = "Create or drop the health tracker schema", long_about = None)]
struct Cli {
    /// Create the schema tables if not already present
    #[arg(long, conflicts_with = "drop_tables")]
    create_tables: bool,

    /// Drop all schema tables
    #[arg(long)]
    drop_tables: bool,

    /// Database file path (defaults to $HT_DB, then ./ht.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let db_path = DbPath::resolve(cli.db);

    if cli.create_tables {
        cmd_create_tables(&db_path)
    } else if cli.drop_tables {
        cmd_drop_tables(&db_path)
    } else {
        println!("no action specified");
        Ok(())
    }
}

fn cmd_create_tables(db_path: &DbPath) -> Result<()> {
    let mut conn = Connection::open(db_path.as_path())?;
    Schema::init(&mut conn)?;
    println!("Created tables in {}", db_path.as_path().display());
    Ok(())
}

fn cmd_drop_tables(db_path: &DbPath) -> Result<()> {
    let mut conn = Connection::open(db_path.as_path())?;
    Schema::drop(&mut conn)?;
    println!("Dropped tables in {}", db_path.as_path().display());
    Ok(())
}
