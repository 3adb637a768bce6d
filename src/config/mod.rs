use std::fmt;
use std::fs;

use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod validator;

#[derive(Debug)]
pub struct ConfigError;

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Configuration error")
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = error_stack::Result<T, ConfigError>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Playlists are fetched from the Spotify account named by `username`.
    #[default]
    Catalog,
    /// Playlists are listed literally in the config file.
    Declared,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationProfile {
    /// Full rule set, including the 25-character username convention.
    #[default]
    Strict,
    /// Skips the username length check and substitutes `mp3` for an
    /// unknown output format instead of failing.
    Lenient,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeclaredPlaylist {
    pub name: String,
    pub url: String,
}

/// Run-wide options. Loaded once at startup, validated immediately and held
/// read-only for the rest of the run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub playlists: Vec<DeclaredPlaylist>,
    pub root_folder: String,
    #[serde(default)]
    pub folder_per_playlist: bool,
    pub output_format: String,
    #[serde(default)]
    pub generate_m3u: bool,
    #[serde(default)]
    pub lyrics_provider: Option<String>,
    #[serde(default)]
    pub download_threads: Option<u32>,
    #[serde(default)]
    pub search_threads: Option<u32>,
    #[serde(default)]
    pub validation_profile: ValidationProfile,
    #[serde(default = "default_true")]
    pub prompt_default_accept: bool,
    #[serde(default)]
    pub abort_on_empty_selection: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Reads the config file, validates the raw document and deserializes it.
    /// Validation happens on the raw JSON so type mismatches can be reported
    /// by field name instead of as a serde error.
    pub fn load(config_path: &str) -> ConfigResult<Self> {
        let config_content = fs::read_to_string(config_path)
            .into_report()
            .attach_printable(format!("Failed to read config file at {}", config_path))
            .change_context(ConfigError)?;
        let mut raw: Value = serde_json::from_str(&config_content)
            .into_report()
            .attach_printable("Failed to parse the config file. Ensure it is valid JSON.")
            .change_context(ConfigError)?;
        validator::validate(&mut raw)?;
        let config: Config = serde_json::from_value(raw)
            .into_report()
            .change_context(ConfigError)?;
        Ok(config)
    }
}
