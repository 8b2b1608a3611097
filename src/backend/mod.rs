//! Transport layer for the feedback backend.
//!
//! This module owns the HTTP client and the typed endpoint calls used by
//! the catalog, the orchestrator and the directory.

pub mod client;

pub use client::{BackendClient, BackendSettings};
