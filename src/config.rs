//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! growth_factor = 1.1
//! max_conflict_retries = 3
//! recompute_on_auto_hide = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::timeline::DEFAULT_GROWTH_FACTOR;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Relative growth in rating count that earns a new timeline entry.
    pub growth_factor: f64,
    /// Retries after a version conflict before the error reaches the caller.
    pub max_conflict_retries: u32,
    /// Recompute when a rating is hidden automatically by report count.
    /// When false, such hides leave the subject stale until its next mutation.
    pub recompute_on_auto_hide: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max_conflict_retries: 3,
            recompute_on_auto_hide: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(source).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        // A factor of 1.0 or less would append an entry on every recomputation.
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(EngineError::Config(format!(
                "growth_factor must be greater than 1.0, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}
