//! InMemory store
//!
//! All repositories share one `Tables` value behind a single async mutex.
//! Each repository method holds the lock for its whole duration and checks
//! every constraint before its first write, which gives each method the
//! all-or-nothing visibility of a database transaction.

mod chat_room;
mod message;
mod store;
mod user;

pub use chat_room::InMemoryChatRoomRepository;
pub use message::InMemoryMessageRepository;
pub use store::{InMemoryStore, Tables};
pub use user::InMemoryUserRepository;
