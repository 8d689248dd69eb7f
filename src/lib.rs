//! # ht - Personal Health Tracker
//!
//! A data layer for tracking weight measurements and eating events,
//! stored in SQLite, plus a small CLI for creating and dropping the schema.

pub mod cli;
pub mod core;
pub mod db;
pub mod error;

// Re-export commonly used types
pub use core::{Eat, Food, Repository, Weight};
pub use error::{Error, Result};

pub use db::Connection;
