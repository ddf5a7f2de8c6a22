//! Queue-driven message ingestion.
//!
//! [`IngestionConsumer`] pulls one record at a time from a [`MessageQueue`],
//! decodes it by its key into an [`IngestCommand`], hands it to the
//! [`RecordDispatcher`] and commits the offset once the store accepted it.
//!
//! [`MessageQueue`]: crate::domain::MessageQueue

mod consumer;
mod record;

pub use consumer::{ConsumerExit, ConsumerStats, IngestionConsumer};
pub use record::{
    DecodeError, DispatchError, DispatchOutcome, IngestCommand, MESSAGE_KIND, RecordDispatcher,
    UPDATE_STATUS_KIND,
};
