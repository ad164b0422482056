//! Type inference and string coercion for override values.
//!
//! Overrides arriving from environment variables or command-line switches
//! are always raw strings. The base configuration declares what type each
//! field actually holds, so a coercion map is built once from the base
//! layer's leaf values and consulted whenever a string override targets a
//! known field. Fields the base never declared fall back to string
//! passthrough.

use std::collections::HashMap;

use chrono::DateTime;
use serde_json::{Map, Number, Value};
use strata_core::join_key_path;

/// How a raw string override is converted back into a typed value.
///
/// One variant per value type the base configuration can declare at a
/// leaf; dispatch is by tag rather than stored closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// `true`/`1` (case-insensitive) become true, anything else false
    Boolean,
    /// Integer parse first, then float; unparsable input stays a string
    Number,
    /// RFC 3339 timestamps, normalized; unparsable input stays a string
    DateTime,
    /// Bracketed CSV convention: `[a,b,c]` becomes a list of strings
    List,
    /// Identity passthrough
    Text,
}

impl Coercion {
    /// Applies the coercion to a raw string value
    pub fn apply(self, raw: &str) -> Value {
        match self {
            Coercion::Boolean => {
                Value::Bool(raw.eq_ignore_ascii_case("true") || raw == "1")
            },
            Coercion::Number => {
                if let Ok(int) = raw.trim().parse::<i64>() {
                    return Value::Number(Number::from(int));
                }

                if let Ok(float) = raw.trim().parse::<f64>() {
                    if let Some(number) = Number::from_f64(float) {
                        return Value::Number(number);
                    }
                }

                Value::String(raw.to_string())
            },
            Coercion::DateTime => match DateTime::parse_from_rfc3339(raw) {
                Ok(timestamp) => Value::String(timestamp.to_rfc3339()),
                Err(_) => Value::String(raw.to_string()),
            },
            Coercion::List => {
                // remove front and back brackets, then split on commas
                let mut chars = raw.chars();
                chars.next();
                chars.next_back();

                Value::Array(
                    chars
                        .as_str()
                        .split(',')
                        .map(|part| Value::String(part.to_string()))
                        .collect(),
                )
            },
            Coercion::Text => Value::String(raw.to_string()),
        }
    }
}

/// Maps each dotted leaf path of the base configuration to the coercion
/// its declared type implies. Built once per resolution; later layers
/// never change it.
#[derive(Debug, Clone, Default)]
pub struct TypeCoercionMap {
    entries: HashMap<String, Coercion>,
}

impl TypeCoercionMap {
    /// Walks the base configuration and records a coercion for every leaf
    /// field. Null leaves register nothing and nested mappings recurse
    /// with an extended path prefix.
    pub fn from_base(base: &Value) -> Self {
        let mut map = Self::default();

        if let Value::Object(source) = base {
            map.walk(source, "");
        }

        map
    }

    fn walk(&mut self, source: &Map<String, Value>, parent: &str) {
        for (key, value) in source {
            let key_path = join_key_path(parent, key);

            match value {
                Value::Null => {},
                Value::Array(_) => {
                    self.entries.insert(key_path, Coercion::List);
                },
                Value::Object(nested) => self.walk(nested, &key_path),
                Value::Bool(_) => {
                    self.entries.insert(key_path, Coercion::Boolean);
                },
                Value::Number(_) => {
                    self.entries.insert(key_path, Coercion::Number);
                },
                Value::String(text) => {
                    let coercion = if DateTime::parse_from_rfc3339(text).is_ok() {
                        Coercion::DateTime
                    } else {
                        Coercion::Text
                    };

                    self.entries.insert(key_path, coercion);
                },
            }
        }
    }

    /// The coercion registered for a dotted path; absent paths coerce as
    /// identity
    pub fn get(&self, key_path: &str) -> Coercion {
        self.entries
            .get(key_path)
            .copied()
            .unwrap_or(Coercion::Text)
    }

    /// Whether the base configuration declared a leaf at this dotted path
    pub fn contains(&self, key_path: &str) -> bool {
        self.entries.contains_key(key_path)
    }

    /// Number of leaf fields the base configuration declared
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
