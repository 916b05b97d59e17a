//! Services behind the HTTP surface.
//!
//! Generic over the repository/embedder/index traits so carebase-core
//! never depends on carebase-infra.

pub mod appointment;
pub mod patient;
pub mod search;
