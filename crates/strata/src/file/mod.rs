//! Configuration file loading with format detection.
//!
//! Files are JSON unless their extension says YAML. Parsing always
//! produces the same dynamic value representation regardless of format,
//! so everything downstream is format-agnostic.

use camino::Utf8Path;
use serde_json::Value;
use strata_core::{ConfigFormat, Layer, StrataError};
use tracing::debug;

use crate::ConfigResult;

/// Selects the on-disk format by file extension; `.yml`/`.yaml` mean
/// YAML, anything else is treated as JSON
pub fn detect_format(path: &Utf8Path) -> ConfigFormat {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
            ConfigFormat::Yaml
        },
        _ => ConfigFormat::Json,
    }
}

/// Parses file content in the given format into a configuration value
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
    layer: Layer,
    path: &Utf8Path,
) -> ConfigResult<Value> {
    let parsed = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| StrataError::Parse {
        layer,
        format,
        path: path.to_string(),
        message,
    })
}

/// Reads and parses one configuration file. A missing file surfaces as
/// NotFound; content that does not parse surfaces as Parse with the
/// underlying diagnostic.
pub async fn load_config_file(path: &Utf8Path, layer: Layer) -> ConfigResult<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StrataError::read(layer, path.as_str(), e))?;

    let format = detect_format(path);
    debug!(%path, %format, %layer, "loaded configuration file");

    parse_config(&content, format, layer, path)
}

/// Async existence probe; unreadable paths count as absent
pub async fn file_exists(path: &Utf8Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
