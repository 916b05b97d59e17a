//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (carebase-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod prescription;
