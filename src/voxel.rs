//! Dense binary occupancy grids.
//!
//! The [`OccupancyGrid`] stores one `bool` per voxel in row-major order
//! `[x][y][z]`, which is also the C order used when the grid is written as an
//! `.npy` array.

use crate::error::{VoxError, VoxResult};

/// A dense 3D grid of occupied/empty cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    /// Number of cells along each axis `[nx, ny, nz]`.
    shape: [usize; 3],
    /// Flat cell array. Index = `ix * ny * nz + iy * nz + iz`.
    data: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-empty grid of the given shape.
    pub fn new(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![false; shape.iter().product()],
        }
    }

    /// Wrap an existing flat cell array. Fails if `data` does not hold
    /// exactly one cell per voxel of `shape`.
    pub fn from_cells(shape: [usize; 3], data: Vec<bool>) -> VoxResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(VoxError::InvalidConfig(format!(
                "grid {shape:?} needs {expected} cells, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// A grid of the given shape with every cell occupied.
    pub fn filled(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![true; shape.iter().product()],
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Flat cell array in `[x][y][z]` order.
    pub fn cells(&self) -> &[bool] {
        &self.data
    }

    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|&&c| c).count()
    }

    fn index(&self, [ix, iy, iz]: [usize; 3]) -> usize {
        let [_, ny, nz] = self.shape;
        ix * ny * nz + iy * nz + iz
    }

    fn in_bounds(&self, at: [usize; 3]) -> bool {
        at.iter().zip(self.shape).all(|(&i, n)| i < n)
    }

    /// Occupancy at `at`. Cells outside the grid read as empty.
    pub fn get(&self, at: [usize; 3]) -> bool {
        self.in_bounds(at) && self.data[self.index(at)]
    }

    /// Set occupancy at `at`.
    ///
    /// # Panics
    /// If `at` lies outside the grid.
    pub fn set(&mut self, at: [usize; 3], occupied: bool) {
        assert!(self.in_bounds(at), "cell {at:?} outside grid {:?}", self.shape);
        let i = self.index(at);
        self.data[i] = occupied;
    }

    /// Keep at most `size` cells per axis, counted from index 0.
    ///
    /// Cells at index `size` and above are discarded even if occupied.
    pub fn cropped(&self, size: usize) -> Self {
        let shape = self.shape.map(|n| n.min(size));
        if shape == self.shape {
            return self.clone();
        }
        let mut out = Self::new(shape);
        self.copy_into(&mut out, [0; 3], shape);
        out
    }

    /// Place this grid inside an empty `size³` grid, as close to centered as
    /// floor division allows.
    ///
    /// Fails with [`VoxError::Oversized`] if any axis is longer than `size`.
    pub fn fit_to_cube(&self, size: usize) -> VoxResult<Self> {
        if self.shape.iter().any(|&n| n > size) {
            return Err(VoxError::Oversized {
                shape: self.shape,
                size,
            });
        }
        let offset = padding_for(self.shape, size);
        let mut out = Self::new([size; 3]);
        self.copy_into(&mut out, offset, self.shape);
        Ok(out)
    }

    /// Copy the `extent` block starting at this grid's origin into `dst`
    /// starting at `offset`.
    fn copy_into(&self, dst: &mut Self, offset: [usize; 3], extent: [usize; 3]) {
        let [ex, ey, ez] = extent;
        for ix in 0..ex {
            for iy in 0..ey {
                let src = self.index([ix, iy, 0]);
                let dst_start = dst.index([ix + offset[0], iy + offset[1], offset[2]]);
                dst.data[dst_start..dst_start + ez].copy_from_slice(&self.data[src..src + ez]);
            }
        }
    }
}

/// Per-axis offset that centers a block of `shape` inside a `size³` cube.
///
/// Each offset is `(size - dim) / 2` rounded down, so an odd remainder ends
/// up on the high-index side. Axes longer than `size` get no padding.
pub fn padding_for(shape: [usize; 3], size: usize) -> [usize; 3] {
    shape.map(|n| size.saturating_sub(n) / 2)
}
