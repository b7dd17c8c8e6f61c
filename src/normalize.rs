//! Centering and unit scaling of mesh vertices.
//!
//! The scale is always measured on the centered vertices: it is the largest
//! absolute coordinate after subtracting the center of mass. What gets
//! divided by that scale depends on [`NormalizeMode`]:
//!
//! - [`NormalizeMode::Literal`] divides the *original* vertices. The mesh is
//!   scaled but not translated, so it only lands in `[-1, 1]` when its
//!   center of mass is already at the origin. Existing training sets were
//!   produced this way.
//! - [`NormalizeMode::Recenter`] divides the centered vertices, giving a mesh
//!   centered on the origin with every coordinate in `[-1, 1]`.

use crate::error::{VoxError, VoxResult};
use crate::mass::center_mass;
use crate::math::{max_abs_component, Vector3};
use crate::types::TriangleMesh;

/// Which vertices are divided by the normalization scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    /// `original / scale`.
    #[default]
    Literal,
    /// `(original - center) / scale`.
    Recenter,
}

/// Result of normalizing a mesh.
#[derive(Clone, Debug)]
pub struct Normalization {
    /// Center of mass of the input mesh.
    pub center: Vector3,
    /// Largest absolute centered coordinate.
    pub scale: f64,
    /// Mesh with normalized vertices and the input's topology.
    pub mesh: TriangleMesh,
}

/// Normalize `mesh` according to `mode`.
pub fn normalize(mesh: &TriangleMesh, mode: NormalizeMode) -> VoxResult<Normalization> {
    if mesh.vertices.iter().any(|v| !v.iter().all(|c| c.is_finite())) {
        return Err(VoxError::NonFinite);
    }

    let center = center_mass(mesh)?;
    let centered: Vec<Vector3> = mesh.vertices.iter().map(|v| v - center).collect();
    let scale = max_abs_component(&centered);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(VoxError::DegenerateScale(scale));
    }

    let vertices: Vec<Vector3> = match mode {
        NormalizeMode::Literal => mesh.vertices.iter().map(|v| v / scale).collect(),
        NormalizeMode::Recenter => centered.into_iter().map(|v| v / scale).collect(),
    };

    Ok(Normalization {
        center,
        scale,
        mesh: mesh.with_vertices(vertices),
    })
}
