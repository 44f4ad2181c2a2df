use std::path::Path;
use std::sync::Once;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Tuning knobs for a [`crate::Reflector`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct ReflectConfig {
    /// Cache direct supertypes of class and parameterized types for the
    /// lifetime of one reflector.
    #[serde(default = "default_true")]
    pub memoize_supertypes: bool,

    /// Treat `Object` as the direct supertype of interfaces that declare no
    /// superinterface (JLS 4.10.2).
    #[serde(default = "default_true")]
    pub implicit_object_supertype: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `genref=trace`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    /// Builds the filter for this config; unparsable directives fall back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            memoize_supertypes: true,
            implicit_object_supertype: true,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_string())
    }
}

impl ReflectConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// JSON schema for the TOML config, for editor integration.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ReflectConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}

/// Install a global `tracing` subscriber for `config`.
///
/// Only the first call has an effect; later calls (and calls made after some
/// other subscriber was installed) are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = config.env_filter();
        let layer = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };
        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!(
                target: "genref.config",
                "a global tracing subscriber is already installed"
            );
        }
    });
}
