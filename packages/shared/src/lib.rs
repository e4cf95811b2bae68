//! Utilities shared across the Hashi gateway packages.

pub mod logger;
pub mod time;
