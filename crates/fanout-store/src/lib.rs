//! Storage layer for the fanout engine: domain models, the immutable spec
//! catalog, and the keyed batch/ticket repository.

pub mod catalog;
pub mod models;
pub mod repo;

pub use catalog::SpecCatalog;
pub use repo::{MemoryRepository, TicketRepository};
