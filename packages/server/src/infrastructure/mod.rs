//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod credential;
pub mod dto;
pub mod queue;
pub mod repository;
