//! Core domain logic for gurukul.
//!
//! This crate holds everything that does not perform I/O: entity types,
//! request payloads with validation, the performance analytics
//! aggregator, repository contracts, external collaborator contracts
//! (completions, OCR, document rendering), and token/password
//! primitives. The server crate wires these to axum, reqwest, and the
//! storage backend.

pub mod analytics;
pub mod auth;
pub mod classroom;
pub mod serde;
pub mod services;
pub mod storage;
