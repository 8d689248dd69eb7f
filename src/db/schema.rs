//! Database schema and row types.

use crate::db::Connection as DbConnection;
use crate::error::Result;
use rusqlite::Row;

/// Schema management for the three health tracker tables.
pub struct Schema;

impl Schema {
    /// Create all tables and indexes.
    ///
    /// Idempotent: running against an already-initialized database is a
    /// no-op, not an error.
    pub fn init(conn: &mut DbConnection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS weight (
                wid INTEGER PRIMARY KEY AUTOINCREMENT,
                weight REAL NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now')),
                modified_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            )",
            &[],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS food (
                fid INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now')),
                modified_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now'))
            )",
            &[],
        )?;

        // eid is an ordinary SQLite rowid and therefore 64-bit; eating
        // events are the high-volume table.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS eat (
                eid INTEGER PRIMARY KEY AUTOINCREMENT,
                fid INTEGER NOT NULL,
                amount TEXT,
                location TEXT,
                deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now')),
                modified_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now')),
                FOREIGN KEY (fid) REFERENCES food(fid)
            )",
            &[],
        )?;

        conn.execute("CREATE INDEX IF NOT EXISTS idx_eat_fid ON eat(fid)", &[])?;

        Ok(())
    }

    /// Drop all tables. Order matters: eat references food.
    pub fn drop(conn: &mut DbConnection) -> Result<()> {
        conn.execute("DROP TABLE IF EXISTS eat", &[])?;
        conn.execute("DROP TABLE IF EXISTS food", &[])?;
        conn.execute("DROP TABLE IF EXISTS weight", &[])?;
        Ok(())
    }

    /// Check if the schema is present (already initialized).
    pub fn is_initialized(conn: &mut DbConnection) -> bool {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='food'")
            .and_then(|mut stmt| Ok(stmt.exists(())?))
            .unwrap_or(false)
    }
}

/// Row representation of a weight measurement from the database.
#[derive(Debug, Clone)]
pub struct WeightRow {
    pub wid: i64,
    pub weight: f64,
    pub created_at: String,
    pub modified_at: String,
}

impl WeightRow {
    /// Create a WeightRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            wid: row.get("wid")?,
            weight: row.get("weight")?,
            created_at: row.get("created_at")?,
            modified_at: row.get("modified_at")?,
        })
    }
}

/// Row representation of a food from the database.
#[derive(Debug, Clone)]
pub struct FoodRow {
    pub fid: i64,
    pub name: String,
    pub created_at: String,
    pub modified_at: String,
}

impl FoodRow {
    /// Create a FoodRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            fid: row.get("fid")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
            modified_at: row.get("modified_at")?,
        })
    }
}

/// Row representation of an eating event from the database.
#[derive(Debug, Clone)]
pub struct EatRow {
    pub eid: i64,
    pub fid: i64,
    pub amount: Option<String>,
    pub location: Option<String>,
    pub deleted: bool,
    pub created_at: String,
    pub modified_at: String,
}

impl EatRow {
    /// Create an EatRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            eid: row.get("eid")?,
            fid: row.get("fid")?,
            amount: row.get("amount")?,
            location: row.get("location")?,
            deleted: row.get("deleted")?,
            created_at: row.get("created_at")?,
            modified_at: row.get("modified_at")?,
        })
    }
}
