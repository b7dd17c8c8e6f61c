//! Linear algebra type aliases and numeric tolerances.

pub type Vector3 = nalgebra::Vector3<f64>;

/// Signed volume below which a mesh is treated as open or flat when
/// integrating mass properties.
pub const VOLUME_TOL: f64 = 1e-12;

/// Total surface area below which a mesh is treated as degenerate.
pub const AREA_TOL: f64 = 1e-12;

/// Largest absolute coordinate of any vector in `points`.
///
/// Returns `0.0` for an empty slice.
pub fn max_abs_component(points: &[Vector3]) -> f64 {
    points
        .iter()
        .map(|p| p.abs().max())
        .fold(0.0, f64::max)
}
