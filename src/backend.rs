//! The geometry collaborator used by the batch voxelizer.
//!
//! [`MeshBackend`] is the seam between the batch pipeline and everything
//! format- or rasterization-specific. The pipeline only ever loads a mesh,
//! voxelizes it, and crops the result; tests substitute fakes that return
//! canned meshes and grids.

use std::path::Path;

use crate::config::MAX_SUBDIVIDE_ITER;
use crate::error::VoxResult;
use crate::import::load_mesh;
use crate::types::TriangleMesh;
use crate::voxel::OccupancyGrid;
use crate::voxelize::voxelize_subdivide;

/// Mesh loading and voxelization capabilities.
pub trait MeshBackend {
    /// Read a mesh from `path`.
    fn load(&self, path: &Path) -> VoxResult<TriangleMesh>;

    /// Rasterize `mesh` into a tight occupancy grid with voxels of edge
    /// length `pitch`.
    fn voxelize(&self, mesh: &TriangleMesh, pitch: f64) -> VoxResult<OccupancyGrid>;

    /// Truncate `grid` to at most `size` cells per axis.
    fn crop(&self, grid: OccupancyGrid, size: usize) -> OccupancyGrid {
        grid.cropped(size)
    }
}

/// STL/OBJ/OFF loading plus subdivision voxelization.
#[derive(Clone, Copy, Debug)]
pub struct DefaultBackend {
    /// Maximum midpoint-subdivision depth per triangle.
    pub max_subdivide_iter: u32,
}

impl Default for DefaultBackend {
    fn default() -> Self {
        Self {
            max_subdivide_iter: MAX_SUBDIVIDE_ITER,
        }
    }
}

impl MeshBackend for DefaultBackend {
    fn load(&self, path: &Path) -> VoxResult<TriangleMesh> {
        load_mesh(path)
    }

    fn voxelize(&self, mesh: &TriangleMesh, pitch: f64) -> VoxResult<OccupancyGrid> {
        voxelize_subdivide(mesh, pitch, self.max_subdivide_iter)
    }
}
