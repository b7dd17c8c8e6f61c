use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use voxprep::config::{
    DEFAULT_DEST_DIR, DEFAULT_SOURCE_DIR, GRID_SIZE, MAX_SUBDIVIDE_ITER, VOXEL_PITCH,
};
use voxprep::export::NpyDtype;
use voxprep::normalize::NormalizeMode;
use voxprep::{BatchVoxelizer, Config, DefaultBackend};

/// Element type of the written arrays.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Dtype {
    /// float64 0.0/1.0
    F8,
    /// uint8 0/1
    U8,
    /// NumPy bool
    Bool,
}

impl From<Dtype> for NpyDtype {
    fn from(d: Dtype) -> Self {
        match d {
            Dtype::F8 => NpyDtype::F64,
            Dtype::U8 => NpyDtype::U8,
            Dtype::Bool => NpyDtype::Bool,
        }
    }
}

/// Convert every mesh in a directory into a fixed-size binary voxel grid.
#[derive(Parser, Debug)]
#[command(name = "voxprep", version)]
struct Args {
    /// Directory of input meshes (STL, OBJ, OFF). Not searched recursively.
    #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Output directory for `{n}.npy` grids; created if missing.
    #[arg(long, default_value = DEFAULT_DEST_DIR)]
    dest_dir: PathBuf,

    /// Edge length of the output grid in voxels.
    #[arg(long, default_value_t = GRID_SIZE)]
    grid_size: usize,

    /// Voxel edge length in normalized mesh units.
    #[arg(long, default_value_t = VOXEL_PITCH)]
    pitch: f64,

    #[arg(long, value_enum, default_value_t = Dtype::F8)]
    dtype: Dtype,

    /// Subtract the center of mass before scaling. Without this flag the
    /// original vertices are divided by the centered scale.
    #[arg(long, default_value_t = false)]
    recenter: bool,

    /// Log and skip files that fail to load or voxelize instead of aborting.
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// Maximum triangle subdivision depth during voxelization.
    #[arg(long, default_value_t = MAX_SUBDIVIDE_ITER)]
    max_subdivide_iter: u32,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            source_dir: args.source_dir.clone(),
            dest_dir: args.dest_dir.clone(),
            grid_size: args.grid_size,
            pitch: args.pitch,
            dtype: args.dtype.into(),
            normalize: if args.recenter {
                NormalizeMode::Recenter
            } else {
                NormalizeMode::Literal
            },
            keep_going: args.keep_going,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let backend = DefaultBackend {
        max_subdivide_iter: args.max_subdivide_iter,
    };
    let voxelizer =
        BatchVoxelizer::new(Config::from(&args), backend).context("invalid arguments")?;

    let mut stdout = io::stdout().lock();
    let report = voxelizer.run(&mut stdout).with_context(|| {
        format!(
            "batch voxelization of {} failed",
            voxelizer.config().source_dir.display()
        )
    })?;

    if !report.failed.is_empty() {
        info!("{} files failed; see errors above", report.failed.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config() {
        let args = Args::try_parse_from(["voxprep"]).unwrap();
        assert_eq!(Config::from(&args), Config::default());
    }

    #[test]
    fn dtype_and_recenter_flags() {
        let args = Args::try_parse_from(["voxprep", "--dtype", "bool", "--recenter"]).unwrap();
        let cfg = Config::from(&args);
        assert_eq!(cfg.dtype, NpyDtype::Bool);
        assert_eq!(cfg.normalize, NormalizeMode::Recenter);

        let args = Args::try_parse_from(["voxprep", "--dtype", "u8"]).unwrap();
        assert_eq!(Config::from(&args).dtype, NpyDtype::U8);
        assert!(Args::try_parse_from(["voxprep", "--dtype", "f4"]).is_err());
    }
}
