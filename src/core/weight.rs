//! Weight measurement model and operations.

use crate::db::schema::WeightRow;
use crate::db::{format_time, now, Session, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A weight measurement. Standalone, no relationships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub wid: i64,
    pub weight: f64,
    pub created_at: String,
    pub modified_at: String,
}

impl Weight {
    /// Convert a WeightRow to a Weight.
    pub fn from_row(row: WeightRow) -> Self {
        Self {
            wid: row.wid,
            weight: row.weight,
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

/// Record a weight measurement. Time defaults to now, whole-second.
pub fn record(sess: &Session, value: f64, time: Option<NaiveDateTime>) -> Result<Weight> {
    let ts = match time {
        Some(t) => format_time(t),
        None => now(),
    };

    sess.execute(
        "INSERT INTO weight (weight, created_at, modified_at) VALUES (?, ?, ?)",
        &[
            &value as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
            &ts as &dyn rusqlite::ToSql,
        ],
    )?;

    get(sess, sess.last_insert_rowid())
}

/// Get a weight measurement by id.
pub fn get(sess: &Session, wid: i64) -> Result<Weight> {
    let row = sess.query_row(
        "SELECT * FROM weight WHERE wid = ?",
        &[&wid as &dyn rusqlite::ToSql],
        WeightRow::from_row,
    )?;
    Ok(Weight::from_row(row))
}

/// List all weight measurements, oldest first.
pub fn list(sess: &Session) -> Result<Vec<Weight>> {
    let rows = sess.query(
        "SELECT * FROM weight ORDER BY created_at, wid",
        &[],
        WeightRow::from_row,
    )?;
    Ok(rows.into_iter().map(Weight::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Connection, Schema};

    fn setup_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_record_weight() {
        let mut conn = setup_conn();
        let sess = conn.session().unwrap();

        let w = record(&sess, 72.5, None).unwrap();
        assert_eq!(w.wid, 1);
        assert_eq!(w.weight, 72.5);
        assert_eq!(w.created_at, w.modified_at);
    }

    #[test]
    fn test_record_weight_with_time() {
        let mut conn = setup_conn();
        let sess = conn.session().unwrap();

        let time = chrono::NaiveDate::from_ymd_opt(2018, 7, 31)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let w = record(&sess, 71.0, Some(time)).unwrap();
        assert_eq!(w.created_at, "2018-07-31T08:30:00");
        assert_eq!(w.created_time().unwrap(), time);
    }

    #[test]
    fn test_list_weights_oldest_first() {
        let mut conn = setup_conn();
        let sess = conn.session().unwrap();

        let t1 = chrono::NaiveDate::from_ymd_opt(2018, 7, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let t2 = chrono::NaiveDate::from_ymd_opt(2018, 7, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        record(&sess, 73.0, Some(t2)).unwrap();
        record(&sess, 72.0, Some(t1)).unwrap();

        let weights = list(&sess).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].weight, 72.0);
        assert_eq!(weights[1].weight, 73.0);
    }

    #[test]
    fn test_created_time_invalid() {
        let w = Weight {
            wid: 1,
            weight: 70.0,
            created_at: "not a timestamp".to_string(),
            modified_at: "not a timestamp".to_string(),
        };
        assert!(matches!(
            w.created_time(),
            Err(Error::InvalidTimestamp(_))
        ));
    }
}
