//! Core traits, types, and error handling for codingops.
//!
//! This crate provides the foundational abstractions used across all
//! codingops components: the [`CodingApi`] trait implemented by the HTTP
//! client, the [`ConnectionManager`] that owns it, and the sequential
//! fan-out helper used by multi-step operations.

pub mod config;
pub mod connection;
pub mod error;
pub mod fanout;
pub mod provider;
pub mod types;

pub use config::{CodingConfig, Config, ConfigOverrides};
pub use connection::{Connection, ConnectionManager};
pub use error::{Error, Result};
pub use provider::CodingApi;
pub use types::*;
