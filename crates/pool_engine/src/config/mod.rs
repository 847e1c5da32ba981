//! Pool configuration
//!
//! Pool manifests are loaded once at startup and are immutable afterwards.
//! Validation happens at load time, before any instance is created, so a
//! bad manifest fails fast instead of corrupting a running registry.

use serde::{Deserialize, Serialize};

use crate::scene::PrototypeId;

/// Configuration trait
///
/// Supports TOML and RON files, selected by extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Manifest failed validation
    #[error("Invalid pool configuration: {0}")]
    Invalid(String),
}

/// Configuration for a single pool, immutable after construction.
///
/// `refill_batch == 0` means the pool never grows past `initial_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSpec {
    /// Unique tag identifying this pool
    pub tag: String,
    /// Prototype the host instantiates new instances from
    pub prototype: PrototypeId,
    /// Number of instances created eagerly at startup
    pub initial_size: usize,
    /// Instances added per refill when the pool looks exhausted
    #[serde(default)]
    pub refill_batch: usize,
    /// Hard cap on the total number of instances ever created
    pub max_size: usize,
}

impl PoolSpec {
    /// Create a spec with the default sizing (10 eager, no refill, cap 30)
    pub fn new(tag: impl Into<String>, prototype: impl Into<PrototypeId>) -> Self {
        Self {
            tag: tag.into(),
            prototype: prototype.into(),
            initial_size: 10,
            refill_batch: 0,
            max_size: 30,
        }
    }

    /// Set the eager instance count
    #[must_use]
    pub const fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Set the refill batch size (0 disables refilling)
    #[must_use]
    pub const fn with_refill_batch(mut self, refill_batch: usize) -> Self {
        self.refill_batch = refill_batch;
        self
    }

    /// Set the hard cap on total instances
    #[must_use]
    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Validate this spec
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Invalid("pool tag cannot be empty".to_string()));
        }
        if self.prototype.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "pool '{}' has an empty prototype id",
                self.tag
            )));
        }
        if self.max_size < self.initial_size {
            return Err(ConfigError::Invalid(format!(
                "pool '{}': max_size {} is below initial_size {}",
                self.tag, self.max_size, self.initial_size
            )));
        }
        Ok(())
    }
}

/// Ordered list of pool specs making up one registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolManifest {
    /// Pool specs, in registration order
    pub pools: Vec<PoolSpec>,
}

impl PoolManifest {
    /// Validate every spec and reject duplicate tags
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for spec in &self.pools {
            spec.validate()?;
            if !seen.insert(spec.tag.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate pool tag '{}'",
                    spec.tag
                )));
            }
        }
        Ok(())
    }
}

impl Config for PoolManifest {}
