use crate::error::{VoxError, VoxResult};
use crate::math::Vector3;

/// An indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vector3>,
    /// Triangle indices (every 3 consecutive values form one triangle).
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Build a mesh, checking that every index refers to a vertex and that
    /// the index buffer holds whole triangles.
    pub fn new(vertices: Vec<Vector3>, indices: Vec<u32>) -> VoxResult<Self> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(VoxError::InvalidFace {
                index,
                vertex_count: vertices.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(VoxError::InvalidFace {
                index: indices.len() as u32,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Same topology, different vertex positions.
    ///
    /// `vertices` must have the same length as `self.vertices`.
    pub fn with_vertices(&self, vertices: Vec<Vector3>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Drop vertices no face refers to, keeping the order of the rest.
    pub fn without_unused_vertices(self) -> Self {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        for &i in &self.indices {
            remap[i as usize] = 0;
        }
        if remap.iter().all(|&r| r == 0) {
            return self;
        }

        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (slot, v) in remap.iter_mut().zip(&self.vertices) {
            if *slot == 0 {
                *slot = vertices.len() as u32;
                vertices.push(*v);
            }
        }
        let indices = self.indices.iter().map(|&i| remap[i as usize]).collect();
        Self { vertices, indices }
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate the corner positions of each triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }

    /// Axis-aligned bounds of the vertex set, or `None` for a mesh without
    /// vertices.
    pub fn bounds(&self) -> Option<BBox3> {
        BBox3::from_points(&self.vertices)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox3 {
    pub min: Vector3,
    pub max: Vector3,
}

impl BBox3 {
    pub fn new(min: Vector3, max: Vector3) -> Self { Self { min, max } }
    pub fn size(&self) -> Vector3 { self.max - self.min }

    pub fn from_points(points: &[Vector3]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().fold(Self::new(first, first), |b, p| {
            Self::new(b.min.inf(p), b.max.sup(p))
        }))
    }
}
