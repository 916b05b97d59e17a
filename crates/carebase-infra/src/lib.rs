//! Infrastructure adapters for Carebase.
//!
//! Implements the carebase-core ports: SQLite repositories via sqlx,
//! a LanceDB embedding index, a fastembed local embedder, and a calamine
//! XLSX record source for the startup load.

pub mod sheets;
pub mod sqlite;
pub mod vector;
