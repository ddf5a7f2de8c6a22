//! Utilities shared by the Obrolan binaries: logger setup and time helpers.

pub mod logger;
pub mod time;
