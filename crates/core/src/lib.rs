#![forbid(unsafe_code)]

pub mod exercise;
pub mod model;
pub mod progression;
pub mod shuffle;
pub mod time;

pub use time::{Clock, TimeParseError, TimeValue};
