//! HTTP request handlers for the REST API.

pub mod appointment;
pub mod patient;
pub mod search;
