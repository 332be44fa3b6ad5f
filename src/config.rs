// ⚙️ Draw Configuration - Tunables for a draw run
// Loaded from an optional JSON file; every field has a default

use crate::error::{SantaError, SantaResult};
use crate::rules::DEFAULT_RECENT_YEARS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawConfig {
    /// How many past years a giver must not repeat a recipient from
    #[serde(default = "default_recent_years")]
    pub recent_years: usize,

    /// Solver attempts per population before giving up (None = retry forever)
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Fixed seed for a reproducible draw
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_recent_years() -> usize {
    DEFAULT_RECENT_YEARS
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            recent_years: DEFAULT_RECENT_YEARS,
            max_attempts: None,
            seed: None,
        }
    }
}

impl DrawConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SantaResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SantaError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SantaError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let config: DrawConfig = serde_json::from_str(&content).map_err(|source| SantaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// A zero attempt budget would fail every draw without trying
    pub fn validate(&self) -> SantaResult<()> {
        if self.max_attempts == Some(0) {
            return Err(SantaError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_recent_years(mut self, recent_years: usize) -> Self {
        self.recent_years = recent_years;
        self
    }
}
