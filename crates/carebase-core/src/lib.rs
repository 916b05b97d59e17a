//! Business logic for Carebase.
//!
//! Defines the storage and embedding ports (traits implemented by
//! carebase-infra) and the services behind the HTTP surface: patient CRUD,
//! the composite appointment-info view, semantic search, and the startup
//! data loader. This crate never depends on any specific storage or model
//! technology.

pub mod embedding;
pub mod load;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;
