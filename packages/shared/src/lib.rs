//! Utilities shared across the Hiroba packages.

pub mod logger;
pub mod time;
