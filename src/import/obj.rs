//! Wavefront OBJ import via `tobj`.
//!
//! Faces are triangulated and positions use a single index buffer. Every
//! model (`o`/`g` group) in the file is merged into one mesh; materials are
//! ignored.

use std::path::Path;

use crate::error::{VoxError, VoxResult};
use crate::math::Vector3;
use crate::types::TriangleMesh;

/// Load an OBJ file and merge all of its models.
pub fn load_obj(path: &Path) -> VoxResult<TriangleMesh> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options).map_err(|source| VoxError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for model in &models {
        let base = vertices.len() as u32;
        vertices.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vector3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))),
        );
        indices.extend(model.mesh.indices.iter().map(|&i| base + i));
    }

    log::debug!("{}: {} models merged", path.display(), models.len());
    TriangleMesh::new(vertices, indices)
}
