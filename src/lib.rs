//! Mesh-to-voxel preprocessing.
//!
//! Loads triangle meshes, normalizes them, rasterizes their surface into a
//! binary occupancy grid, and crops/pads the grid to a fixed cube written as
//! a NumPy `.npy` array. [`batch::BatchVoxelizer`] drives the whole pipeline
//! over a directory; [`backend::MeshBackend`] is the seam for mesh loading
//! and rasterization.

pub mod backend;
pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod mass;
pub mod math;
pub mod normalize;
pub mod primitive;
pub mod types;
pub mod voxel;
pub mod voxelize;

pub use backend::{DefaultBackend, MeshBackend};
pub use batch::{BatchReport, BatchVoxelizer, Processed};
pub use config::Config;
pub use error::{VoxError, VoxResult};
pub use types::TriangleMesh;
pub use voxel::OccupancyGrid;
