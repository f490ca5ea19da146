use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::{Result, TesseraError};
use crate::rules::library::GAME_OF_LIFE;
use crate::rules::RuleLibrary;

/// Startup configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Seconds per generation.
    pub speed: f64,
    /// Name of the initial rule set.
    pub rule: String,
    pub seed: Option<u64>,
    /// Extra rule sets merged over the built-in library.
    pub rule_library: Option<PathBuf>,
    pub start_paused: bool,
    pub random_fill: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport_width: 512,
            viewport_height: 512,
            cell_width: 8,
            cell_height: 8,
            speed: 0.1,
            rule: GAME_OF_LIFE.to_string(),
            seed: None,
            rule_library: None,
            start_paused: true,
            random_fill: false,
        }
    }
}

impl SimConfig {
    /// `floor(viewport / cell)` on each axis. Both must be at least one.
    pub fn grid_dimensions(&self) -> Result<(usize, usize)> {
        let width = self.viewport_width.checked_div(self.cell_width).unwrap_or(0) as usize;
        let height = self.viewport_height.checked_div(self.cell_height).unwrap_or(0) as usize;
        if width == 0 || height == 0 {
            return Err(TesseraError::InvalidGeometry { width, height });
        }
        Ok((width, height))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(TesseraError::InvalidSpeed(self.speed));
        }
        self.grid_dimensions()?;
        if self.viewport_width % self.cell_width != 0 || self.viewport_height % self.cell_height != 0 {
            warn!(
                "viewport {}x{} is not a multiple of cell size {}x{}, trailing pixels unused",
                self.viewport_width, self.viewport_height, self.cell_width, self.cell_height
            );
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Built-in rule sets, with the configured library file merged over them.
    pub fn library(&self) -> anyhow::Result<RuleLibrary> {
        let mut library = RuleLibrary::builtin();
        if let Some(path) = &self.rule_library {
            library.merge(RuleLibrary::load_file(path)?);
        }
        Ok(library)
    }
}
