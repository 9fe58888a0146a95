//! Run configuration: lattice geometry, pacing and palette.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Palette;

/// Top-level world configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Area the lattice spans, in pixels
    pub width: u32,
    pub height: u32,
    /// Edge length of one tile in pixels
    pub cell_size: u32,
    /// Space between neighbouring tiles in pixels
    pub gap: u32,
    /// Generations per second once the simulation runs
    pub tick_rate: f32,
    pub palette: Palette,
    /// Probability a cell turns active on random fill
    pub random_fill: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            cell_size: 15,
            gap: 2,
            tick_rate: 1.0,
            palette: Palette::default(),
            random_fill: 0.3,
        }
    }
}

impl WorldConfig {
    /// Distance between neighbouring tile centres.
    #[inline]
    pub fn pitch(&self) -> u32 {
        self.cell_size + self.gap
    }

    /// Number of lattice columns covering `[0, width)`.
    pub fn columns(&self) -> usize {
        self.width.div_ceil(self.pitch()) as usize
    }

    /// Number of lattice rows covering `[0, height)`.
    pub fn rows(&self) -> usize {
        self.height.div_ceil(self.pitch()) as usize
    }

    /// Wraparound extent in pixels per axis.
    /// Equals `(width, height)` when both are multiples of the pitch.
    pub fn extent(&self) -> (u32, u32) {
        let pitch = self.pitch();
        (self.columns() as u32 * pitch, self.rows() as u32 * pitch)
    }

    /// Seconds between two generations.
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        if self.palette.active == self.palette.inactive {
            return Err(ConfigError::IndistinctStates);
        }
        if !(0.0..=1.0).contains(&self.random_fill) {
            return Err(ConfigError::InvalidFill(self.random_fill));
        }
        Ok(())
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Tick rate must be positive, got {0}")]
    InvalidTickRate(f32),
    #[error("Active and inactive states must differ")]
    IndistinctStates,
    #[error("Random fill must be within [0, 1], got {0}")]
    InvalidFill(f64),
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
