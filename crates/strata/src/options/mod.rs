//! Resolution options and their defaults.

use std::collections::HashMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Instructions for one configuration resolution.
///
/// Every field has a default, so callers typically override only what
/// they need:
///
/// ```
/// use strata::ResolveOptions;
///
/// let options = ResolveOptions {
///     base_settings_path: Some("config/settings.json".into()),
///     strict: true,
///     ..ResolveOptions::default()
/// };
/// ```
///
/// Options may also be deserialized from JSON/YAML using camelCase field
/// names; the legacy `baseConfigPath` name is accepted as an alias of
/// `baseSettingsPath`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Path to the base configuration file. Unset means no base layer and
    /// an empty type coercion map.
    #[serde(alias = "baseConfigPath")]
    pub base_settings_path: Option<Utf8PathBuf>,

    /// Directories probed for environment override files
    pub environment_search_paths: Vec<Utf8PathBuf>,

    /// Switch tokens whose following argument names a configuration file
    pub command_line_switches: Vec<String>,

    /// Environment variable name to path-expression mapping for field
    /// overrides
    pub read_environment_map: HashMap<String, String>,

    /// Switch token to path-expression mapping for field overrides
    pub read_command_line_map: HashMap<String, String>,

    /// Drop keys from non-base layers that the base configuration never
    /// declared. Only effective when a base file is configured.
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            base_settings_path: None,
            environment_search_paths: vec![
                Utf8PathBuf::from("./"),
                Utf8PathBuf::from("./config"),
                Utf8PathBuf::from("./settings"),
            ],
            command_line_switches: vec!["--config-file".to_string()],
            read_environment_map: HashMap::new(),
            read_command_line_map: HashMap::new(),
            strict: false,
        }
    }
}

impl ResolveOptions {
    /// The configured base path, treating an empty string as unset
    pub fn base_path(&self) -> Option<&Utf8PathBuf> {
        self.base_settings_path
            .as_ref()
            .filter(|path| !path.as_str().is_empty())
    }
}
