//! Editor configuration.
//!
//! Defaults for newly created entities. Every field has a default, so an
//! empty TOML document yields the stock configuration.

use serde::{Deserialize, Serialize};

use crate::ScaleRange;

/// Errors raised while loading an [`EditorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {message}")]
    ParseError { message: String },

    #[error("invalid value for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

/// Defaults applied by [`FormEditor`](crate::FormEditor) when it creates entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Title given to sections created by `add_section`.
    pub default_section_title: String,

    /// Text given to independent questions created by `add_question`.
    pub default_question_text: String,

    /// Prefix put in front of the parent's text for dependent questions.
    pub dependent_prefix: String,

    /// Range used when a question becomes linear-scale without one.
    pub default_scale_range: ScaleRange,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_section_title: "New Section".to_string(),
            default_question_text: "New Question".to_string(),
            dependent_prefix: "[Dependent]".to_string(),
            default_scale_range: ScaleRange::Five,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("default_section_title", &self.default_section_title),
            ("default_question_text", &self.default_question_text),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}
