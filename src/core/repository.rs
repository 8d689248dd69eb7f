//! Health repository - high-level data operations.

use crate::core::{eat, food, weight};
use crate::core::{Eat, Food, Weight};
use crate::db::{Connection, DbPath, Schema, Session};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// Health tracker repository.
///
/// Owns the database connection. Each operation runs in its own session;
/// callers that need several operations in one transaction use
/// [`Repository::with_session`] directly.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Open a repository at the given path. The schema must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        if !Schema::is_initialized(&mut conn) {
            return Err(Error::NotInitialized);
        }
        Ok(Self { conn })
    }

    /// Open a repository at the resolved default path.
    pub fn open_default() -> Result<Self> {
        Self::open(DbPath::resolve(None).as_path())
    }

    /// Open an in-memory repository with a fresh schema.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Schema::init(&mut conn)?;
        Ok(Self { conn })
    }

    /// Get the underlying connection.
    pub fn conn(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Run a closure inside one transaction.
    ///
    /// Commits on success. On failure the session is rolled back and the
    /// error propagates to the caller; nothing is swallowed.
    pub fn with_session<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Session) -> Result<T>,
    {
        let sess = self.conn.session()?;
        match f(&sess) {
            Ok(value) => {
                sess.commit()?;
                Ok(value)
            }
            Err(e) => {
                // Surface the closure's error, not the rollback's
                let _ = sess.rollback();
                Err(e)
            }
        }
    }

    /// Return the existing food with this name, or create it.
    pub fn find_or_create_food(&mut self, name: &str) -> Result<Food> {
        self.with_session(|sess| food::find_or_create(sess, name))
    }

    /// Record a weight measurement.
    pub fn record_weight(&mut self, value: f64, time: Option<NaiveDateTime>) -> Result<Weight> {
        self.with_session(|sess| weight::record(sess, value, time))
    }

    /// List all weight measurements.
    pub fn list_weights(&mut self) -> Result<Vec<Weight>> {
        self.with_session(weight::list)
    }

    /// Record an eating event, creating the food row if needed.
    pub fn record_eat(
        &mut self,
        food_name: &str,
        amount: Option<&str>,
        location: Option<&str>,
        time: Option<NaiveDateTime>,
    ) -> Result<Eat> {
        self.with_session(|sess| eat::record(sess, food_name, amount, location, time))
    }

    /// Get an eat entry by id.
    pub fn get_eat(&mut self, eid: i64) -> Result<Eat> {
        self.with_session(|sess| eat::get(sess, eid))
    }

    /// List eating events, excluding soft-deleted entries.
    pub fn list_eats(&mut self) -> Result<Vec<Eat>> {
        self.with_session(eat::list)
    }

    /// Soft-delete an eat entry.
    pub fn delete_eat(&mut self, eid: i64) -> Result<()> {
        self.with_session(|sess| eat::mark_deleted(sess, eid))
    }
}
