use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::cleaner::DelimiterPair;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Text cleaning switches
    #[serde(default)]
    pub text_cleaning: TextCleaningConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text cleaning options. Everything is off by default except tag
/// preservation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TextCleaningConfig {
    #[serde(default)]
    pub remove_sdh: bool,

    #[serde(default)]
    pub remove_speaker_labels: bool,

    /// Drop cues containing a music note
    #[serde(default)]
    pub remove_music_notes: bool,

    #[serde(default)]
    pub remove_line_breaks: bool,

    /// Merge consecutive cues with identical content after cleaning
    #[serde(default)]
    pub merge_identical_cues: bool,

    #[serde(default)]
    pub convert_uppercase_to_lowercase: bool,

    #[serde(default)]
    pub remove_dialog_markers: bool,

    #[serde(default)]
    pub remove_formatting_tags: bool,

    #[serde(default = "default_true")]
    pub preserve_italic_tags: bool,

    #[serde(default = "default_true")]
    pub preserve_bold_tags: bool,

    /// Covers font, span and color tags
    #[serde(default = "default_true")]
    pub preserve_font_tags: bool,

    #[serde(default)]
    pub remove_text_in_curly_braces: bool,

    #[serde(default)]
    pub remove_text_in_parentheses: bool,

    #[serde(default)]
    pub remove_text_in_square_brackets: bool,

    #[serde(default)]
    pub remove_text_in_asterisks: bool,

    #[serde(default)]
    pub remove_text_in_hashtags: bool,

    /// Cues containing any of these characters or substrings are dropped.
    /// Accepts a JSON array, or a string holding a JSON array.
    #[serde(default, deserialize_with = "deserialize_custom_chars")]
    pub custom_chars_to_remove: Vec<String>,
}

impl Default for TextCleaningConfig {
    fn default() -> Self {
        Self {
            remove_sdh: false,
            remove_speaker_labels: false,
            remove_music_notes: false,
            remove_line_breaks: false,
            merge_identical_cues: false,
            convert_uppercase_to_lowercase: false,
            remove_dialog_markers: false,
            remove_formatting_tags: false,
            preserve_italic_tags: true,
            preserve_bold_tags: true,
            preserve_font_tags: true,
            remove_text_in_curly_braces: false,
            remove_text_in_parentheses: false,
            remove_text_in_square_brackets: false,
            remove_text_in_asterisks: false,
            remove_text_in_hashtags: false,
            custom_chars_to_remove: Vec::new(),
        }
    }
}

impl TextCleaningConfig {
    /// Whether text between this delimiter pair is removed
    pub fn removes_delimited(&self, pair: DelimiterPair) -> bool {
        match pair {
            DelimiterPair::CurlyBraces => self.remove_text_in_curly_braces,
            DelimiterPair::Parentheses => self.remove_text_in_parentheses,
            DelimiterPair::SquareBrackets => self.remove_text_in_square_brackets,
            DelimiterPair::Asterisks => self.remove_text_in_asterisks,
            DelimiterPair::Hashtags => self.remove_text_in_hashtags,
        }
    }

    /// Parse the custom character list from its JSON array form.
    ///
    /// Examples:
    ///   `[]` removes nothing
    ///   `["j\""]` removes cues containing `j"` anywhere
    ///
    /// Invalid JSON yields an empty list and a warning.
    pub fn parse_custom_chars(raw: &str) -> Vec<String> {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(chars) => chars,
            Err(e) => {
                warn!(
                    "Invalid JSON format for custom_chars_to_remove: {} ({}). Using empty list.",
                    raw, e
                );
                Vec::new()
            }
        }
    }
}

fn deserialize_custom_chars<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let chars = match value {
        Value::Null => Vec::new(),
        Value::String(raw) => TextCleaningConfig::parse_custom_chars(&raw),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    warn!("Ignoring non-string custom_chars_to_remove entry: {}", other);
                    None
                }
            })
            .collect(),
        other => {
            warn!(
                "Invalid value for custom_chars_to_remove: {}. Using empty list.",
                other
            );
            Vec::new()
        }
    };

    Ok(chars)
}

/// Where and how cleaned files are written
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Inserted before the extension: `movie.srt` -> `movie.<suffix>.srt`
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    /// Also write a `<stem>.<suffix>.diff` report of every changed cue
    #[serde(default)]
    pub write_diff_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            write_diff_report: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_suffix() -> String {
    "clean".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let suffix = self.output.suffix.trim();
        if suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.suffix",
                message: "must not be empty".to_string(),
            });
        }
        if suffix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "output.suffix",
                message: format!("must not contain path separators: {}", suffix),
            });
        }

        Ok(())
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load a configuration file, writing the default one first if it
    /// does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
