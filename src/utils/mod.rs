//! Utility functions and helpers

pub mod time;

pub use time::{format_iso8601, iso8601_now};
