//! Core health tracker models and operations.

pub mod eat;
pub mod food;
pub mod repository;
pub mod weight;

pub use eat::Eat;
pub use food::Food;
pub use repository::Repository;
pub use weight::Weight;
