//! Closed primitive meshes.
//!
//! Used as fixtures and sanity inputs; every primitive has outward-facing
//! counter-clockwise winding, so its signed volume is positive.

use crate::math::Vector3;
use crate::types::TriangleMesh;

/// Axis-aligned box centered at `center` with the given half-extents.
///
/// 8 vertices, 12 triangles.
pub fn make_box(center: Vector3, half: Vector3) -> TriangleMesh {
    let (hx, hy, hz) = (half.x, half.y, half.z);
    let vertices = [
        Vector3::new(-hx, -hy, -hz), // 0: ---
        Vector3::new( hx, -hy, -hz), // 1: +--
        Vector3::new( hx,  hy, -hz), // 2: ++-
        Vector3::new(-hx,  hy, -hz), // 3: -+-
        Vector3::new(-hx, -hy,  hz), // 4: --+
        Vector3::new( hx, -hy,  hz), // 5: +-+
        Vector3::new( hx,  hy,  hz), // 6: +++
        Vector3::new(-hx,  hy,  hz), // 7: -++
    ]
    .map(|v| v + center)
    .to_vec();

    #[rustfmt::skip]
    let indices = vec![
        0, 3, 2,  0, 2, 1, // bottom (z-)
        4, 5, 6,  4, 6, 7, // top (z+)
        0, 1, 5,  0, 5, 4, // front (y-)
        3, 7, 6,  3, 6, 2, // back (y+)
        0, 4, 7,  0, 7, 3, // left (x-)
        1, 2, 6,  1, 6, 5, // right (x+)
    ];

    TriangleMesh { vertices, indices }
}

/// Axis-aligned cube with edge length `side`.
pub fn make_cube(center: Vector3, side: f64) -> TriangleMesh {
    make_box(center, Vector3::from_element(side * 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass::volume;
    use approx::assert_relative_eq;

    #[test]
    fn box_volume_positive() {
        let mesh = make_box(Vector3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 2.0, 0.5));
        assert_relative_eq!(volume(&mesh), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn cube_has_twelve_triangles() {
        let mesh = make_cube(Vector3::zeros(), 2.0);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.face_count(), 12);
    }
}
