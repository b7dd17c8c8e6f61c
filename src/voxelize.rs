//! Surface voxelization by recursive midpoint subdivision.
//!
//! Every triangle is split into four (at its edge midpoints) until no edge is
//! longer than half a voxel. The corners of the resulting triangles are then
//! snapped to the nearest voxel center, so the output marks the voxels the
//! surface passes through. The interior of a closed mesh stays empty.
//!
//! Triangles are rasterized independently and in parallel with rayon; the
//! union of their cells does not depend on evaluation order.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::error::{VoxError, VoxResult};
use crate::math::Vector3;
use crate::types::TriangleMesh;
use crate::voxel::OccupancyGrid;

type Cell = [i64; 3];

/// Voxelize the surface of `mesh` with voxels of edge length `pitch`.
///
/// The returned grid is tight: its origin cell is the per-axis minimum of
/// all hit cells, and its shape is `max - min + 1` per axis.
pub fn voxelize_subdivide(
    mesh: &TriangleMesh,
    pitch: f64,
    max_iter: u32,
) -> VoxResult<OccupancyGrid> {
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(VoxError::InvalidConfig(format!("voxel pitch must be positive, got {pitch}")));
    }
    if mesh.is_empty() {
        return Err(VoxError::EmptyMesh);
    }
    if mesh.vertices.iter().any(|v| !v.iter().all(|c| c.is_finite())) {
        return Err(VoxError::NonFinite);
    }

    let max_edge = pitch / 2.0;
    let per_triangle: Vec<Vec<Cell>> = mesh
        .indices
        .par_chunks_exact(3)
        .map(|t| {
            let tri = [
                mesh.vertices[t[0] as usize],
                mesh.vertices[t[1] as usize],
                mesh.vertices[t[2] as usize],
            ];
            rasterize_triangle(tri, pitch, max_edge, max_iter)
        })
        .collect::<VoxResult<_>>()?;

    let cells: HashSet<Cell> = per_triangle.into_iter().flatten().collect();
    Ok(dense_from_cells(&cells))
}

/// Longest edge of a triangle.
fn longest_edge([a, b, c]: &[Vector3; 3]) -> f64 {
    (b - a).norm().max((c - b).norm()).max((a - c).norm())
}

/// Voxel cell containing `p`. Halfway cases round to even, matching NumPy.
fn cell_of(p: &Vector3, pitch: f64) -> Cell {
    [p.x, p.y, p.z].map(|c| (c / pitch).round_ties_even() as i64)
}

fn rasterize_triangle(
    tri: [Vector3; 3],
    pitch: f64,
    max_edge: f64,
    max_iter: u32,
) -> VoxResult<Vec<Cell>> {
    // Each split halves every edge. Bail out before doing the work if the
    // limit can't be met.
    let reachable = max_edge * 2f64.powi(max_iter as i32);
    if longest_edge(&tri) > reachable * (1.0 + 1e-9) {
        return Err(VoxError::SubdivisionLimit { max_iter });
    }

    let mut cells = Vec::new();
    let mut stack = vec![(tri, 0u32)];
    while let Some((t, depth)) = stack.pop() {
        if longest_edge(&t) <= max_edge {
            cells.extend(t.iter().map(|p| cell_of(p, pitch)));
            continue;
        }
        if depth >= max_iter {
            return Err(VoxError::SubdivisionLimit { max_iter });
        }
        let [a, b, c] = t;
        let ab = (a + b) * 0.5;
        let bc = (b + c) * 0.5;
        let ca = (c + a) * 0.5;
        let next = depth + 1;
        stack.extend([
            ([a, ab, ca], next),
            ([ab, b, bc], next),
            ([ca, bc, c], next),
            ([ab, bc, ca], next),
        ]);
    }

    cells.sort_unstable();
    cells.dedup();
    Ok(cells)
}

fn dense_from_cells(cells: &HashSet<Cell>) -> OccupancyGrid {
    let mut min = [i64::MAX; 3];
    let mut max = [i64::MIN; 3];
    for cell in cells {
        for axis in 0..3 {
            min[axis] = min[axis].min(cell[axis]);
            max[axis] = max[axis].max(cell[axis]);
        }
    }
    if cells.is_empty() {
        return OccupancyGrid::new([0; 3]);
    }

    let shape = [0, 1, 2].map(|axis| (max[axis] - min[axis] + 1) as usize);
    let mut grid = OccupancyGrid::new(shape);
    for cell in cells {
        grid.set([0, 1, 2].map(|axis| (cell[axis] - min[axis]) as usize), true);
    }
    grid
}
