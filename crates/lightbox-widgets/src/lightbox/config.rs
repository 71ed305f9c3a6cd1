#![forbid(unsafe_code)]

//! Lightbox configuration.
//!
//! With the `config-file` feature a config can be read from TOML or JSON:
//!
//! ```toml
//! fade_ms = 250
//! base_url = "https://example.com"
//!
//! [local_content]
//! terms = "<h1>Terms</h1>"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Default fade duration for the overlay and the desktop entrance.
pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

/// Immutable widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxConfig {
    /// Overlay fade and desktop entrance duration.
    pub fade_duration: Duration,
    /// Prefix prepended to remote targets.
    pub base_url: String,
    /// Named HTML fragments addressable as `@name`.
    pub local_content: HashMap<String, String>,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            fade_duration: DEFAULT_FADE,
            base_url: String::new(),
            local_content: HashMap::new(),
        }
    }
}

impl LightboxConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fade duration.
    #[must_use]
    pub fn fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration = duration;
        self
    }

    /// Set the remote URL prefix.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Register a local fragment under `key`.
    #[must_use]
    pub fn local_content(mut self, key: impl Into<String>, html: impl Into<String>) -> Self {
        self.local_content.insert(key.into(), html.into());
        self
    }
}

/// Errors from loading a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The document was not valid TOML for this schema.
    Toml(String),
    /// The document was not valid JSON for this schema.
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "failed to read lightbox config: {msg}"),
            Self::Toml(msg) => write!(f, "invalid TOML lightbox config: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON lightbox config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "config-file")]
mod file {
    use super::{ConfigError, LightboxConfig};
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct RawConfig {
        fade_ms: Option<u64>,
        base_url: Option<String>,
        local_content: HashMap<String, String>,
    }

    impl From<RawConfig> for LightboxConfig {
        fn from(raw: RawConfig) -> Self {
            let defaults = LightboxConfig::default();
            Self {
                fade_duration: raw
                    .fade_ms
                    .map_or(defaults.fade_duration, Duration::from_millis),
                base_url: raw.base_url.unwrap_or(defaults.base_url),
                local_content: raw.local_content,
            }
        }
    }

    impl LightboxConfig {
        /// Parse a TOML document.
        pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
            let raw: RawConfig =
                toml::from_str(src).map_err(|e| ConfigError::Toml(e.to_string()))?;
            Ok(raw.into())
        }

        /// Parse a JSON document.
        pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
            let raw: RawConfig =
                serde_json::from_str(src).map_err(|e| ConfigError::Json(e.to_string()))?;
            Ok(raw.into())
        }

        /// Read a config file; `.json` files are parsed as JSON, anything else as TOML.
        pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let src = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                Self::from_json_str(&src)
            } else {
                Self::from_toml_str(&src)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LightboxConfig::default();
        assert_eq!(config.fade_duration, Duration::from_millis(300));
        assert!(config.base_url.is_empty());
        assert!(config.local_content.is_empty());
    }

    #[test]
    fn builder() {
        let config = LightboxConfig::new()
            .fade_duration(Duration::ZERO)
            .base_url("/lb")
            .local_content("terms", "<p>t</p>");
        assert_eq!(config.fade_duration, Duration::ZERO);
        assert_eq!(config.base_url, "/lb");
        assert_eq!(config.local_content["terms"], "<p>t</p>");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_document() {
        let config = LightboxConfig::from_toml_str(
            r#"
            fade_ms = 120
            base_url = "https://example.com"

            [local_content]
            terms = "<h1>Terms</h1>"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.fade_duration, Duration::from_millis(120));
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.local_content["terms"], "<h1>Terms</h1>");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn json_document_uses_defaults_for_missing_keys() {
        let config = LightboxConfig::from_json_str(r#"{"base_url": "/x"}"#).expect("valid json");
        assert_eq!(config.fade_duration, DEFAULT_FADE);
        assert_eq!(config.base_url, "/x");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn unknown_keys_are_rejected() {
        let err = LightboxConfig::from_toml_str("fd = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn from_path_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = dir.path().join("lightbox.json");
        std::fs::write(&json, r#"{"fade_ms": 0}"#).expect("write");
        assert_eq!(
            LightboxConfig::from_path(&json).expect("json").fade_duration,
            Duration::ZERO
        );

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            LightboxConfig::from_path(&missing),
            Err(ConfigError::Io(_))
        ));
    }
}
