//! Builders for unit tests that need model values without a database.

pub mod fixtures;
