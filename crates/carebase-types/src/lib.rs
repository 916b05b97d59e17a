//! Shared domain types for Carebase.
//!
//! Plain data structures and error enums used across all layers.
//! This crate performs no I/O.

pub mod doctor;
pub mod error;
pub mod patient;
pub mod visit;
