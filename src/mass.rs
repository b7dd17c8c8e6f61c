//! Mass properties of triangle meshes.
//!
//! The center of mass treats the mesh as a solid of uniform density: each
//! triangle forms a signed tetrahedron with the origin, and the centroid is
//! the volume-weighted average of those tetrahedra. Open or flat meshes have
//! no meaningful volume, so they fall back to the area-weighted surface
//! centroid, and a mesh with no area falls back to the mean vertex.

use crate::error::{VoxError, VoxResult};
use crate::math::{Vector3, AREA_TOL, VOLUME_TOL};
use crate::types::TriangleMesh;

/// Center of mass of `mesh`.
pub fn center_mass(mesh: &TriangleMesh) -> VoxResult<Vector3> {
    if mesh.is_empty() {
        return Err(VoxError::EmptyMesh);
    }

    let mut volume = 0.0;
    let mut weighted = Vector3::zeros();
    for [a, b, c] in mesh.triangles() {
        // Six times the signed volume of tetrahedron (0, a, b, c).
        let v6 = a.dot(&b.cross(&c));
        volume += v6;
        weighted += (a + b + c) * v6;
    }
    if volume.abs() > VOLUME_TOL {
        return Ok(weighted / (4.0 * volume));
    }

    log::debug!("mesh volume {volume:.3e} too small, using surface centroid");
    if let Some(c) = surface_centroid(mesh) {
        return Ok(c);
    }

    log::debug!("mesh area too small, using vertex mean");
    let sum = mesh
        .vertices
        .iter()
        .fold(Vector3::zeros(), |acc, v| acc + v);
    Ok(sum / mesh.vertices.len() as f64)
}

/// Signed volume enclosed by `mesh` (positive for outward-facing winding).
pub fn volume(mesh: &TriangleMesh) -> f64 {
    mesh.triangles()
        .map(|[a, b, c]| a.dot(&b.cross(&c)))
        .sum::<f64>()
        / 6.0
}

fn surface_centroid(mesh: &TriangleMesh) -> Option<Vector3> {
    let mut area = 0.0;
    let mut weighted = Vector3::zeros();
    for [a, b, c] in mesh.triangles() {
        let tri_area = (b - a).cross(&(c - a)).norm() * 0.5;
        area += tri_area;
        weighted += (a + b + c) / 3.0 * tri_area;
    }
    (area > AREA_TOL).then(|| weighted / area)
}
