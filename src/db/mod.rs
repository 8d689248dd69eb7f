//! Database layer for the ht health tracker.
//!
//! Handles the SQLite connection, schema creation, and low-level queries.

mod connection;
pub mod schema;

pub use connection::{format_time, now, Connection, DbPath, Session, TIMESTAMP_FORMAT};
pub use schema::{EatRow, FoodRow, Schema, WeightRow};
