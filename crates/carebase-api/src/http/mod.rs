//! HTTP/REST API layer for Carebase.
//!
//! Axum-based REST API with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
