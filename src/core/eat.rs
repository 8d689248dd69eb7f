//! Eating event model and operations.
//!
//! An eat entry references exactly one food row. Creating an entry resolves
//! the food by name first, inside the same session, so a new food and its
//! first eat entry land in one transaction.

use crate::core::food;
use crate::db::schema::EatRow;
use crate::db::{format_time, now, Session, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An eating event with its resolved food name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eat {
    pub eid: i64,
    pub fid: i64,
    pub food: String,
    pub amount: Option<String>,
    pub location: Option<String>,
    pub deleted: bool,
    pub created_at: String,
    pub modified_at: String,
}

impl Eat {
    fn from_row(row: EatRow, food: String) -> Self {
        Self {
            eid: row.eid,
            fid: row.fid,
            food,
            amount: row.amount,
            location: row.location,
            deleted: row.deleted,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }

    /// Parse the stored creation timestamp.
    pub fn created_time(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT)
            .map_err(|_| Error::InvalidTimestamp(self.created_at.clone()))
    }
}

/// Record an eating event.
///
/// Resolves (or creates) the food row for `food_name` in the same session.
/// Time defaults to now, whole-second.
pub fn record(
    sess: &Session,
    food_name: &str,
    amount: Option<&str>,
    location: Option<&str>,
    time: Option<NaiveDateTime>,
) -> Result<Eat> {
    let food = food::find_or_create(sess, food_name)?;

    let ts = match time {
        Some(t) => format_time(t),
        None => now(),
    };

    sess.execute(
        "INSERT INTO eat (fid, amount, location, created_at, modified_at)
         VALUES (?, ?, ?, ?, ?)",
        &[
            &food.fid as &dyn rusqlite::ToSql,
            &amount as &dyn rusqlite::ToSql,
            &location as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
        ],
    )?;

    get(sess, sess.last_insert_rowid())
}

/// Get an eat entry by id. Soft-deleted entries are still reachable here.
pub fn get(sess: &Session, eid: i64) -> Result<Eat> {
    let row = sess.query_opt(
        "SELECT * FROM eat WHERE eid = ?",
        &[&eid as &dyn rusqlite::ToSql],
        EatRow::from_row,
    )?;
    let row = row.ok_or(Error::EatNotFound(eid))?;
    let food = food::get(sess, row.fid)?;
    Ok(Eat::from_row(row, food.name))
}

/// List eating events, oldest first. Soft-deleted entries are excluded.
pub fn list(sess: &Session) -> Result<Vec<Eat>> {
    let rows = sess.query(
        "SELECT eat.*, food.name AS food_name
         FROM eat JOIN food ON food.fid = eat.fid
         WHERE eat.deleted = 0
         ORDER BY eat.created_at, eat.eid",
        &[],
        |row| {
            let name: String = row.get("food_name")?;
            Ok((EatRow::from_row(row)?, name))
        },
    )?;
    Ok(rows
        .into_iter()
        .map(|(row, name)| Eat::from_row(row, name))
        .collect())
}

/// Soft-delete an eat entry and refresh its modified timestamp.
pub fn mark_deleted(sess: &Session, eid: i64) -> Result<()> {
    let changed = sess.execute(
        "UPDATE eat SET deleted = 1, modified_at = ? WHERE eid = ?",
        &[&now() as &dyn rusqlite::ToSql, &eid as &dyn rusqlite::ToSql],
    )?;
    if changed == 0 {
        return Err(Error::EatNotFound(eid));
    }
    Ok(())
}
