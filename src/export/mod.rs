//! Array writers for processed occupancy grids.
//!
//! - **NPY**: NumPy `.npy` v1.0, one dense C-order array per file, plus a
//!   reader for the same files

pub mod npy;

pub use npy::{read_npy, save_npy, write_npy, NpyDtype};
