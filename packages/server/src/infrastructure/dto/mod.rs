//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `queue`: JSON payloads of queue records
//! - `http`: HTTP API request/response bodies

pub mod conversion;
pub mod http;
pub mod queue;
