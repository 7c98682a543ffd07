//! `Tasklist` mock REST endpoint library.
//!
//! Exposes the fixture server for use in tests and embedding. Every route
//! answers with hardcoded records regardless of the request; nothing is
//! persisted.

pub mod config;
pub mod routes;
