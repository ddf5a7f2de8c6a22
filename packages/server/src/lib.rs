//! Obrolan chat backend.
//!
//! Messages arrive on a queue and are applied by [`ingestion`]; the HTTP API
//! in [`ui`] serves accounts, rooms and history from the same store.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ingestion;
pub mod ui;
pub mod usecase;
