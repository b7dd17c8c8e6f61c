//! Directory-to-directory batch voxelization.
//!
//! [`BatchVoxelizer::run`] walks the source directory (non-recursively, in
//! file-name order), turns every regular file into a fixed-size occupancy
//! grid and writes it as `{n}.npy`, where `n` counts the files processed so
//! far in this run. Skipped and failed files do not consume a number.
//!
//! Progress lines go to the caller-supplied writer:
//! ```text
//! Processed: chair.stl as 0.npy
//! ERROR: Voxel Exceeded 32x32x32. Skipping
//! All Done!
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::backend::MeshBackend;
use crate::config::Config;
use crate::error::{VoxError, VoxResult};
use crate::export::save_npy;
use crate::normalize::normalize;
use crate::types::TriangleMesh;
use crate::voxel::OccupancyGrid;

/// One grid written during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Processed {
    /// Input mesh file.
    pub source: PathBuf,
    /// Output counter value assigned to it.
    pub index: usize,
    /// Written `.npy` file.
    pub output: PathBuf,
}

/// Summary of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Successfully written grids, in counter order.
    pub processed: Vec<Processed>,
    /// Files whose cropped grid did not fit the target cube.
    pub skipped: Vec<PathBuf>,
    /// Files that failed to load or voxelize (keep-going mode only).
    pub failed: Vec<(PathBuf, String)>,
}

/// Runs the normalize → voxelize → crop → pad pipeline over a directory.
pub struct BatchVoxelizer<B> {
    config: Config,
    backend: B,
}

impl<B: MeshBackend> BatchVoxelizer<B> {
    /// Create a voxelizer after validating `config`.
    pub fn new(config: Config, backend: B) -> VoxResult<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize, voxelize, crop and pad one mesh into a `grid_size³` grid.
    ///
    /// Returns [`VoxError::Oversized`] if the backend's crop left an axis
    /// longer than the grid size.
    pub fn process_mesh(&self, mesh: &TriangleMesh) -> VoxResult<OccupancyGrid> {
        let size = self.config.grid_size;
        let norm = normalize(mesh, self.config.normalize)?;
        debug!(
            "center {:?}, scale {}, {} faces",
            norm.center.as_slice(),
            norm.scale,
            norm.mesh.face_count()
        );

        let raw = self.backend.voxelize(&norm.mesh, self.config.pitch)?;
        debug!("raw voxel grid {:?}", raw.shape());

        let cropped = self.backend.crop(raw, size);
        cropped.fit_to_cube(size)
    }

    /// Load and process the mesh at `path`.
    pub fn process_file(&self, path: &Path) -> VoxResult<OccupancyGrid> {
        let mesh = self.backend.load(path)?;
        if let Some(b) = mesh.bounds() {
            debug!(
                "{}: {} vertices, extent {:?}",
                path.display(),
                mesh.vertices.len(),
                b.size().as_slice()
            );
        }
        self.process_mesh(&mesh)
    }

    /// Process every regular file in the source directory.
    ///
    /// The destination directory is created if needed; existing files in it
    /// are overwritten, starting again from `0.npy`.
    pub fn run<W: Write>(&self, progress: &mut W) -> VoxResult<BatchReport> {
        let cfg = &self.config;
        fs::create_dir_all(&cfg.dest_dir).map_err(|e| VoxError::io(&cfg.dest_dir, e))?;

        let mut entries = fs::read_dir(&cfg.source_dir)
            .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
            .map_err(|e| VoxError::io(&cfg.source_dir, e))?;
        entries.sort_by_key(|e| e.file_name());
        info!(
            "Processing {} entries from {} into {}",
            entries.len(),
            cfg.source_dir.display(),
            cfg.dest_dir.display()
        );

        let mut report = BatchReport::default();
        let mut counter = 0usize;
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();

            match self.process_file(&path) {
                Ok(grid) => {
                    let file_name = format!("{counter}.{}", cfg.extension());
                    let output = cfg.dest_dir.join(&file_name);
                    save_npy(&grid, cfg.dtype, &output)?;
                    say(progress, &format!("Processed: {name} as {file_name}"))?;
                    info!(
                        "{} -> {} ({} voxels)",
                        path.display(),
                        output.display(),
                        grid.occupied_count()
                    );
                    report.processed.push(Processed {
                        source: path,
                        index: counter,
                        output,
                    });
                    counter += 1;
                }
                Err(VoxError::Oversized { shape, size }) => {
                    let line = format!("ERROR: Voxel Exceeded {size}x{size}x{size}. Skipping");
                    say(progress, &line)?;
                    warn!("{}: cropped grid {shape:?} exceeds {size}, skipped", path.display());
                    report.skipped.push(path);
                }
                Err(e) if cfg.keep_going => {
                    error!("{}: {e}", path.display());
                    report.failed.push((path, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        say(progress, "All Done!")?;
        info!(
            "{} written, {} skipped, {} failed",
            report.processed.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

fn say<W: Write>(progress: &mut W, line: &str) -> VoxResult<()> {
    writeln!(progress, "{line}").map_err(|e| VoxError::io("<progress>", e))
}
