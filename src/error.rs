//! Error types for mesh loading, voxelization and array export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preprocessing a mesh.
#[derive(Error, Debug)]
pub enum VoxError {
    /// Filesystem access failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// No loader handles this file extension.
    #[error("unsupported mesh format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A mesh file was malformed.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The OBJ loader rejected a file.
    #[error("failed to load OBJ {}: {source}", .path.display())]
    Obj {
        /// The file being loaded.
        path: PathBuf,
        /// Underlying loader error.
        source: tobj::LoadError,
    },

    /// A face referenced a vertex that does not exist.
    #[error("face index {index} out of range for {vertex_count} vertices")]
    InvalidFace {
        /// Offending index value.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The mesh has no triangles to work with.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// Normalization scale was zero or not finite.
    #[error("cannot normalize mesh: scale is {0}")]
    DegenerateScale(f64),

    /// A vertex coordinate was NaN or infinite.
    #[error("mesh contains non-finite coordinates")]
    NonFinite,

    /// Triangles were still too coarse after the maximum subdivision depth.
    #[error("subdivision exceeded {max_iter} iterations")]
    SubdivisionLimit {
        /// Configured iteration limit.
        max_iter: u32,
    },

    /// A cropped occupancy grid does not fit the target cube.
    #[error("voxel grid {shape:?} exceeds {size}x{size}x{size}")]
    Oversized {
        /// Shape of the offending grid.
        shape: [usize; 3],
        /// Target edge length.
        size: usize,
    },

    /// An `.npy` stream could not be read or written.
    #[error("npy: {0}")]
    Npy(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VoxError {
    /// Wrap an [`std::io::Error`] with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VoxError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`VoxError::Parse`] for `path`.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        VoxError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for preprocessing operations.
pub type VoxResult<T> = Result<T, VoxError>;
