//! `.quill.jsonc` configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::ValueEnum;
use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid embedded config schema: {0}")]
    Schema(String),
}

/// Output format of the `walk` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Direction of the `walk` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkDirection {
    #[default]
    Forward,
    Backward,
}

/// Defaults for `quill walk`. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct WalkConfig {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub merge_characters: bool,
    pub direction: WalkDirection,
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

impl WalkConfig {
    /// Config file names, in lookup order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".quill.jsonc", ".quill.json"];

    /// Contents written by `quill init`.
    pub const DEFAULT_CONTENTS: &'static str = r#"{
  "$schema": "https://quill.dev/schemas/v1/config.json",
  // Report adjacent characters with equal attributes as one TEXT event
  "mergeCharacters": false,
  "direction": "forward",
  "format": "text"
}
"#;

    /// Loads the configuration from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_jsonc(&content)
    }

    /// Parses JSON or JSONC and validates it against the schema.
    pub fn from_jsonc(content: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value =
                    serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
                Validator::new(&schema_json).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| ConfigError::Schema(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(ConfigError::Validation(format!(
                "{} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Finds the first config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads `explicit` when given, otherwise a discovered file in the
    /// working directory, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover("."),
        };

        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
