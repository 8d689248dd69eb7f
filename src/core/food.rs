//! Food model and operations.
//!
//! Food rows are keyed by a unique name; everything that references a food
//! goes through [`find_or_create`].

use crate::db::schema::FoodRow;
use crate::db::{now, Session};
use crate::error::{is_unique_violation, Error, Result};
use serde::{Deserialize, Serialize};

/// A food item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub fid: i64,
    pub name: String,
    pub created_at: String,
    pub modified_at: String,
}

impl Food {
    /// Convert a FoodRow to a Food.
    pub fn from_row(row: FoodRow) -> Self {
        Self {
            fid: row.fid,
            name: row.name,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

/// Find a food by its unique name.
pub fn find(sess: &Session, name: &str) -> Result<Option<Food>> {
    let row = sess.query_opt(
        "SELECT * FROM food WHERE name = ?",
        &[&name as &dyn rusqlite::ToSql],
        FoodRow::from_row,
    )?;
    Ok(row.map(Food::from_row))
}

/// Get a food by id.
pub fn get(sess: &Session, fid: i64) -> Result<Food> {
    let row = sess.query_opt(
        "SELECT * FROM food WHERE fid = ?",
        &[&fid as &dyn rusqlite::ToSql],
        FoodRow::from_row,
    )?;
    row.map(Food::from_row).ok_or(Error::FoodNotFound(fid))
}

/// Return the existing food with this name, or insert and return a new one.
///
/// The insert's generated id is available through `last_insert_rowid` while
/// the session is still open, so the caller's transaction stays intact. If
/// the insert hits the unique constraint (another writer got there first),
/// the row is re-read once; only a failed re-read surfaces as a conflict.
pub fn find_or_create(sess: &Session, name: &str) -> Result<Food> {
    if let Some(food) = find(sess, name)? {
        return Ok(food);
    }

    let ts = now();
    let inserted = sess.execute_raw(
        "INSERT INTO food (name, created_at, modified_at) VALUES (?, ?, ?)",
        &[
            &name as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
        ],
    );

    match inserted {
        Ok(_) => get(sess, sess.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => {
            find(sess, name)?.ok_or_else(|| Error::FoodConflict(name.to_string()))
        }
        Err(e) => Err(Error::Db(e)),
    }
}
