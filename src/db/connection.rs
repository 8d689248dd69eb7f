//! Database connection and session management.

use crate::error::{Error, Result};
use rusqlite::{Connection as SqliteConnection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};

/// Storage format for timestamps. Whole seconds, no zone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time as a whole-second timestamp string.
pub fn now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Format a caller-supplied time for storage, truncating subseconds.
pub fn format_time(time: chrono::NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Path to the health tracker database file.
#[derive(Debug, Clone)]
pub struct DbPath {
    path: PathBuf,
}

impl DbPath {
    /// Default filename "ht.db" in the current directory.
    pub fn default_path() -> Self {
        Self {
            path: PathBuf::from("ht.db"),
        }
    }

    /// Create a DbPath from a string path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the database path: explicit argument, then the HT_DB
    /// environment variable, then the default.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self { path };
        }
        match std::env::var_os("HT_DB") {
            Some(path) => Self {
                path: PathBuf::from(path),
            },
            None => Self::default_path(),
        }
    }

    /// Get the path as a reference.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Check if the database file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for DbPath {
    fn default() -> Self {
        Self::default_path()
    }
}

/// Database connection wrapper.
pub struct Connection {
    conn: SqliteConnection,
}

impl Connection {
    /// Open a connection to the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = SqliteConnection::open(path)?;
        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self { conn })
    }

    /// Open a connection to the default ht.db file.
    pub fn open_default() -> Result<Self> {
        Self::open(DbPath::default_path().as_path())
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self { conn })
    }

    /// Begin a session: a transaction that must be committed or rolled back.
    pub fn session(&mut self) -> Result<Session> {
        let tx = self.conn.transaction()?;
        Ok(Session { tx })
    }

    /// Execute a statement and return the number of rows affected.
    pub fn execute(&mut self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<usize> {
        self.conn.execute(sql, params).map_err(Error::from)
    }

    /// Prepare a statement for execution.
    pub fn prepare(&mut self, sql: &str) -> Result<rusqlite::Statement> {
        self.conn.prepare(sql).map_err(Error::from)
    }

    /// Query a single row.
    pub fn query_row<T, F>(&mut self, sql: &str, params: &[&dyn rusqlite::ToSql], f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        self.conn.query_row(sql, params, f).map_err(Error::from)
    }

    /// Check if a table exists.
    pub fn table_exists(&mut self, table_name: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?",
            [table_name],
            |_| Ok(true),
        );
        match exists {
            Ok(true) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(Error::from(e)),
            _ => Ok(false),
        }
    }
}

/// A unit of work: wraps one transaction.
///
/// Entity operations borrow a `Session` and never end it. The party that
/// opened the session (`Repository::with_session`, or a caller holding one
/// directly) owns the commit/rollback decision. Operations that create rows
/// in multiple tables at once share one session.
pub struct Session<'a> {
    tx: Transaction<'a>,
}

impl Session<'_> {
    /// Execute a statement and return the number of rows affected.
    pub fn execute(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<usize> {
        self.tx.execute(sql, params).map_err(Error::from)
    }

    /// Raw statement execution, exposing the rusqlite error for
    /// constraint classification.
    pub fn execute_raw(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> rusqlite::Result<usize> {
        self.tx.execute(sql, params)
    }

    /// Query a single row. Missing rows surface as a database error.
    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn rusqlite::ToSql], f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        self.tx.query_row(sql, params, f).map_err(Error::from)
    }

    /// Query zero or one row.
    pub fn query_opt<T, F>(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
        f: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        self.tx
            .query_row(sql, params, f)
            .optional()
            .map_err(Error::from)
    }

    /// Query multiple rows.
    pub fn query<T, F>(&self, sql: &str, params: &[&dyn rusqlite::ToSql], f: F) -> Result<Vec<T>>
    where
        F: FnMut(&rusqlite::Row) -> rusqlite::Result<T>,
    {
        let mut stmt = self.tx.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Id of the most recently inserted row. Populated inside an open
    /// transaction, so no commit is needed before referencing it.
    pub fn last_insert_rowid(&self) -> i64 {
        self.tx.last_insert_rowid()
    }

    /// Commit the session.
    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(Error::from)
    }

    /// Roll the session back.
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::Schema;

    #[test]
    fn test_db_path_default() {
        let path = DbPath::default_path();
        assert_eq!(path.as_path(), Path::new("ht.db"));
    }

    #[test]
    fn test_db_path_new() {
        let path = DbPath::new("custom.db");
        assert_eq!(path.as_path(), Path::new("custom.db"));
    }

    #[test]
    fn test_db_path_resolve_explicit() {
        let path = DbPath::resolve(Some(PathBuf::from("other.db")));
        assert_eq!(path.as_path(), Path::new("other.db"));
    }

    #[test]
    fn test_db_path_exists() {
        let path = DbPath::new("nonexistent.db");
        assert!(!path.exists());

        let temp = tempfile::NamedTempFile::new().unwrap();
        let existing = DbPath::new(temp.path());
        assert!(existing.exists());
    }

    #[test]
    fn test_now_is_whole_second() {
        let ts = now();
        // 2026-08-30T12:34:56
        assert_eq!(ts.len(), 19);
        assert!(!ts.contains('.'));
    }

    #[test]
    fn test_format_time_truncates_subseconds() {
        let time = chrono::NaiveDate::from_ymd_opt(2018, 7, 31)
            .unwrap()
            .and_hms_milli_opt(8, 30, 15, 250)
            .unwrap();
        assert_eq!(format_time(time), "2018-07-31T08:30:15");
    }

    #[test]
    fn test_connection_open_in_memory() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();
        assert!(conn.table_exists("food").unwrap());
    }

    #[test]
    fn test_session_commit() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        {
            let sess = conn.session().unwrap();
            sess.execute(
                "INSERT INTO food (name) VALUES (?)",
                &[&"apple" as &dyn rusqlite::ToSql],
            )
            .unwrap();
            sess.commit().unwrap();
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM food", &[], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_session_rollback() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        {
            let sess = conn.session().unwrap();
            sess.execute(
                "INSERT INTO food (name) VALUES (?)",
                &[&"apple" as &dyn rusqlite::ToSql],
            )
            .unwrap();
            sess.rollback().unwrap();
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM food", &[], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_session_drop_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        {
            let sess = conn.session().unwrap();
            sess.execute(
                "INSERT INTO food (name) VALUES (?)",
                &[&"apple" as &dyn rusqlite::ToSql],
            )
            .unwrap();
            // Dropped without commit
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM food", &[], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_last_insert_rowid_inside_open_session() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        let sess = conn.session().unwrap();
        sess.execute(
            "INSERT INTO food (name) VALUES (?)",
            &[&"apple" as &dyn rusqlite::ToSql],
        )
        .unwrap();
        assert_eq!(sess.last_insert_rowid(), 1);
    }
}
