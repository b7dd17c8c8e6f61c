//! Batch configuration and its defaults.

use std::path::PathBuf;

use crate::error::{VoxError, VoxResult};
use crate::export::NpyDtype;
use crate::normalize::NormalizeMode;

/// Edge length, in voxels, of every output grid.
pub const GRID_SIZE: usize = 32;

/// Voxel edge length in normalized mesh units.
pub const VOXEL_PITCH: f64 = 0.0625;

/// Directory scanned for input meshes.
pub const DEFAULT_SOURCE_DIR: &str = "unprocessed_data";

/// Directory that receives the `.npy` grids.
pub const DEFAULT_DEST_DIR: &str = "processed_npys";

/// Subdivision depth limit for the default voxelizer.
pub const MAX_SUBDIVIDE_ITER: u32 = 10;

/// Settings for one batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub grid_size: usize,
    pub pitch: f64,
    pub dtype: NpyDtype,
    pub normalize: NormalizeMode,
    /// Record load/voxelize failures and move on instead of aborting.
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            grid_size: GRID_SIZE,
            pitch: VOXEL_PITCH,
            dtype: NpyDtype::default(),
            normalize: NormalizeMode::default(),
            keep_going: false,
        }
    }
}

impl Config {
    /// Check value ranges.
    pub fn validate(&self) -> VoxResult<()> {
        if self.grid_size == 0 {
            return Err(VoxError::InvalidConfig("grid size must be at least 1".into()));
        }
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(VoxError::InvalidConfig(format!(
                "voxel pitch must be positive, got {}",
                self.pitch
            )));
        }
        Ok(())
    }

    /// File extension of written grids.
    pub fn extension(&self) -> &'static str {
        "npy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.source_dir, PathBuf::from("unprocessed_data"));
        assert_eq!(c.dest_dir, PathBuf::from("processed_npys"));
        assert_eq!(c.grid_size, 32);
        assert_eq!(c.pitch, 0.0625);
        assert_eq!(c.normalize, NormalizeMode::Literal);
        assert!(!c.keep_going);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let zero = Config { grid_size: 0, ..Config::default() };
        assert!(zero.validate().is_err());
        let nan = Config { pitch: f64::NAN, ..Config::default() };
        assert!(nan.validate().is_err());
        let neg = Config { pitch: -0.5, ..Config::default() };
        assert!(neg.validate().is_err());
    }
}
