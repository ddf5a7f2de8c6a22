//! Repository implementations.

pub mod inmemory;

pub use inmemory::{
    InMemoryChatRoomRepository, InMemoryMessageRepository, InMemoryStore, InMemoryUserRepository,
};
