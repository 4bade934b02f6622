//! Storage backends.
//!
//! The repository traits in `gurukul_core::storage` are the seam to
//! the record store; this module provides the in-memory backend.

mod inmemory;

pub use inmemory::InMemoryRepository;
