//! HTTP API over the synchronous use cases.

mod error;
mod extractor;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use extractor::Caller;
pub use server::Server;
pub use signal::shutdown_signal;
