//! Shared configuration, extractors, and error handling for Parlor
//!
//! This crate provides common functionality used across the Parlor service:
//! - Configuration management following 12-factor principles
//! - The error taxonomy every domain reports through
//! - Request extractors with built-in validation

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::{Config, LogFormat, StorageBackend};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{ValidatedJson, ValidatedPath};
