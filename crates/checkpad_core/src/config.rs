//! Editor configuration.
//!
//! # Responsibility
//! - Carry host-tunable editor settings with stable defaults.
//! - Reject settings that would make trigger detection or persistence
//!   ambiguous.
//!
//! # Invariants
//! - `storage_key` is non-blank.
//! - `trigger_token` is non-empty and single-line.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used by the original web build for the checklist value.
pub const DEFAULT_STORAGE_KEY: &str = "todoItems";
/// Character sequence that turns trailing free text into a checklist.
pub const DEFAULT_TRIGGER_TOKEN: &str = "[] ";

/// What happens to free text typed before the trigger token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreTriggerText {
    /// Text stays in its free-text block; the first item starts empty.
    #[default]
    KeepAsFreeText,
    /// The last line before the token moves into the first item; earlier
    /// lines stay free text.
    SeedFirstItem,
}

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Key under which the checklist JSON value is stored.
    pub storage_key: String,
    pub trigger_token: String,
    pub pre_trigger_text: PreTriggerText,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            trigger_token: DEFAULT_TRIGGER_TOKEN.to_string(),
            pre_trigger_text: PreTriggerText::default(),
        }
    }
}

impl EditorConfig {
    /// Parses a JSON config object; absent fields take their defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` when the input is not a valid config object.
    /// - Any `validate()` error.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        if self.trigger_token.is_empty() {
            return Err(ConfigError::EmptyTriggerToken);
        }
        if self.trigger_token.contains(['\n', '\r']) {
            return Err(ConfigError::MultilineTriggerToken);
        }
        Ok(())
    }
}

/// Invalid editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    BlankStorageKey,
    EmptyTriggerToken,
    MultilineTriggerToken,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid editor config: {message}"),
            Self::BlankStorageKey => write!(f, "storage_key must not be blank"),
            Self::EmptyTriggerToken => write!(f, "trigger_token must not be empty"),
            Self::MultilineTriggerToken => {
                write!(f, "trigger_token must not contain line breaks")
            }
        }
    }
}

impl Error for ConfigError {}
