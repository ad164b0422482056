//! Core identifiers shared across the strata crates.
//!
//! This module provides:
//! - Layer identifiers naming each configuration source
//! - Config file format tags
//! - Key-path helpers for namespaced field references

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies which configuration source a value or error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// The base configuration file
    Base,
    /// The environment override file (plus environment variable overrides)
    Environment,
    /// The command-line supplied file (plus command-line switch overrides)
    CommandLine,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Base => write!(f, "base"),
            Layer::Environment => write!(f, "environment"),
            Layer::CommandLine => write!(f, "command-line"),
        }
    }
}

/// On-disk format of a configuration file, selected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            ConfigFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Joins a parent key path and a field name into a namespaced dotted path.
/// An empty parent yields the field name unchanged.
pub fn join_key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        [parent, key].join(".")
    }
}
