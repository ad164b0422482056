//! Deep merge / clone engine for configuration layers.
//!
//! Layers merge in order into a freshly cloned result, later layers
//! overriding earlier ones at the leaf level. Nested mappings merge
//! recursively, arrays replace wholesale, and an optional schema (the
//! type coercion map built from the base layer) filters scalar additions
//! from every layer except the first.

use serde_json::{Map, Value};
use strata_core::join_key_path;

use crate::coerce::TypeCoercionMap;

/// Controls for one merge pass
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions<'a> {
    /// When set, scalar leaves from non-primary layers are dropped unless
    /// their dotted path is a known base-configuration field
    pub schema: Option<&'a TypeCoercionMap>,

    /// Dotted paths exempt from schema filtering. Explicitly mapped
    /// environment/command-line overrides land here; they are intentional
    /// even when the base never declared the field.
    pub allowed_paths: &'a [String],

    /// Remove sub-objects left empty after merging (prevents schema
    /// filtering from leaving empty shells behind)
    pub strip_empty: bool,
}

/// Merges an ordered list of layers into one cloned mapping.
///
/// The first layer is always copied in full; it is the trusted source the
/// schema was derived from. Non-mapping layers contribute nothing.
pub fn merge(layers: &[&Value], options: MergeOptions<'_>) -> Value {
    let mut result = Map::new();

    for (index, layer) in layers.iter().enumerate() {
        if let Value::Object(source) = layer {
            merge_into(&mut result, source, "", index == 0, options);
        }
    }

    Value::Object(result)
}

fn merge_into(
    destination: &mut Map<String, Value>,
    source: &Map<String, Value>,
    parent: &str,
    trusted: bool,
    options: MergeOptions<'_>,
) {
    for (key, value) in source {
        let key_path = join_key_path(parent, key);

        match value {
            // arrays are not element-wise merged
            Value::Array(_) => {
                destination.insert(key.clone(), value.clone());
            },
            Value::Object(nested) => {
                let mut target = match destination.get(key) {
                    Some(Value::Object(existing)) => existing.clone(),
                    _ => Map::new(),
                };

                merge_into(&mut target, nested, &key_path, trusted, options);

                if options.strip_empty && target.is_empty() {
                    destination.remove(key);
                } else {
                    destination.insert(key.clone(), Value::Object(target));
                }
            },
            _ => {
                let allowed = trusted
                    || options
                        .schema
                        .map_or(true, |schema| schema.contains(&key_path))
                    || options.allowed_paths.iter().any(|path| *path == key_path);

                if allowed {
                    destination.insert(key.clone(), value.clone());
                }
            },
        }
    }
}
