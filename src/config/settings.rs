//! TOML-based configuration for datamodel.
//!
//! Supports a config file (datamodel.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! catalog = "${APP_ROOT}/models.json"
//!
//! [operations]
//! include = true
//! include_internal = false
//!
//! [polymorphism]
//! strict = false
//!
//! [output]
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Default catalog file (supports ${ENV_VAR} expansion).
    pub catalog: Option<String>,

    /// Operation reflection.
    pub operations: OperationSettings,

    /// Polymorphism resolution.
    pub polymorphism: PolymorphismSettings,

    /// Schema document output.
    pub output: OutputSettings,
}

/// Which callable operations are reflected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OperationSettings {
    /// Reflect operations at all.
    pub include: bool,

    /// Also reflect operations whose name starts with a single underscore.
    pub include_internal: bool,
}

impl Default for OperationSettings {
    fn default() -> Self {
        Self {
            include: true,
            include_internal: false,
        }
    }
}

/// Polymorphism resolution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PolymorphismSettings {
    /// Fail composition when a declared identity has no registered parent,
    /// instead of rendering the model as non-polymorphic.
    pub strict: bool,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Indent the JSON document.
    pub pretty: bool,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `DATAMODEL_CONFIG`
    /// 2. `./datamodel.toml`
    /// 3. `~/.config/datamodel/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DATAMODEL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("datamodel.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("datamodel").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// The configured catalog path with environment variables expanded.
    pub fn catalog_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.catalog
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
