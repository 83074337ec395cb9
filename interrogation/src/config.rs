use std::fs;
use std::path::Path;

use dossier_formats::DEFAULT_TAG_QUESTION;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::InterrogationError;

/// Engine tunables. Every field has a default, so an empty JSON object (or
/// no file at all) yields the stock behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed seed for variant draws and question templates; entropy when unset.
    pub seed: Option<u64>,
    /// Lets the stress zone override normal selection.
    pub stress_zone_gating: bool,
    /// Template used when a tag type has no question templates.
    pub default_question: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: None,
            stress_zone_gating: false,
            default_question: DEFAULT_TAG_QUESTION.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: Option<&Path>) -> Result<Self, InterrogationError> {
        let Some(path) = path else {
            return Ok(EngineConfig::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| InterrogationError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| InterrogationError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rng(&self) -> StdRng {
        self.rng_for(0)
    }

    /// Generator for the `index`-th suspect; seeded runs give each suspect its
    /// own reproducible stream.
    pub fn rng_for(&self, index: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        }
    }
}
