//! User-facing configuration.
//!
//! The host persists three values and hands them to the core on load and
//! on every reload. Files are TOML; keys may be written in snake_case or
//! in the host's PascalCase spelling.
//!
//! # Example
//!
//! ```rust
//! use translit_ime_core::Config;
//!
//! let config = Config::from_toml_str("UseNativeNumerals = false").unwrap();
//! assert!(!config.use_native_numerals);
//! assert_eq!(config.auto_context_clear_time_ms, 4500);
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::translit::{
    EngineOptions, DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS, DEFAULT_INCLUDE_INHERENT_VOWEL,
    DEFAULT_USE_NATIVE_NUMERALS,
};

/// Errors that can occur when loading or editing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value {value:?} for option {name}")]
    InvalidValue { name: String, value: String },
}

/// Engine-facing options as the user configured them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Inactivity timeout (ms) after which the engine drops its context.
    /// Negative values in a file are read as 0.
    #[serde(alias = "AutoContextClearTimeMs", deserialize_with = "non_negative_ms")]
    pub auto_context_clear_time_ms: u64,

    /// Use script-native digits.
    #[serde(alias = "UseNativeNumerals")]
    pub use_native_numerals: bool,

    /// Keep the inherent vowel (schwa) on bare consonants.
    #[serde(alias = "IncludeInherentVowel")]
    pub include_inherent_vowel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_context_clear_time_ms: DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS,
            use_native_numerals: DEFAULT_USE_NATIVE_NUMERALS,
            include_inherent_vowel: DEFAULT_INCLUDE_INHERENT_VOWEL,
        }
    }
}

fn non_negative_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(value.max(0).unsigned_abs())
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build a config from a flat `name = value` set, starting from defaults.
    pub fn from_named<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            config.set_named(name.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// Set a single option by name.
    pub fn set_named(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "AutoContextClearTimeMs" | "auto_context_clear_time_ms" => {
                let ms: i64 = value.trim().parse().map_err(|_| invalid())?;
                self.auto_context_clear_time_ms = ms.max(0).unsigned_abs();
            }
            "UseNativeNumerals" | "use_native_numerals" => {
                self.use_native_numerals = parse_bool(value).ok_or_else(invalid)?;
            }
            "IncludeInherentVowel" | "include_inherent_vowel" => {
                self.include_inherent_vowel = parse_bool(value).ok_or_else(invalid)?;
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Overlay this configuration on the engine's baseline options.
    pub fn engine_options(&self, defaults: EngineOptions) -> EngineOptions {
        let mut options = defaults;
        options.auto_context_clear_time_ms = self.auto_context_clear_time_ms;
        options.use_native_numerals = self.use_native_numerals;
        options.include_inherent_vowel = self.include_inherent_vowel;
        options
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
