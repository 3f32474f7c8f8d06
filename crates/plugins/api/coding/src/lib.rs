//! CODING DevOps provider implementation for codingops.
//!
//! This crate provides the HTTP client for the CODING open API: projects,
//! issues, depots, commits and merge requests, all through the single
//! action-style endpoint.

mod client;
mod types;

pub use client::CodingClient;

/// Default CODING open API endpoint.
pub const DEFAULT_CODING_URL: &str = codingops_core::config::DEFAULT_API_URL;
