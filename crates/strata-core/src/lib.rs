//! # strata-core
//!
//! Core types shared across the strata configuration crates.
//!
//! This crate provides:
//! - StrataError enum for unified error handling
//! - Layer identifiers naming each configuration source
//! - Key-path helpers for namespaced field references
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `error`: Error types and result aliases
//! - `types`: Layer identifiers and key-path helpers

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{StrataError, StrataResult};
pub use types::{join_key_path, ConfigFormat, Layer};
