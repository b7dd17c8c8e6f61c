//! Mesh loaders.
//!
//! Reads triangle meshes from common interchange formats:
//! - **STL**: binary or ASCII, detected from the file contents
//! - **OBJ**: Wavefront text, triangulated on load
//! - **OFF**: Object File Format, polygons fan-triangulated
//!
//! The loader is chosen from the file extension (case-insensitive). Vertices
//! that no face refers to are dropped, whatever the format.

pub mod obj;
pub mod off;
pub mod stl;

use std::path::Path;

use crate::error::{VoxError, VoxResult};
use crate::types::TriangleMesh;

pub use obj::load_obj;
pub use off::read_off;
pub use stl::read_stl;

/// Load a mesh from `path`, picking the loader by extension.
pub fn load_mesh(path: &Path) -> VoxResult<TriangleMesh> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| VoxError::UnsupportedFormat(path.to_path_buf()))?;

    let mesh = match ext.as_str() {
        "stl" => {
            let bytes = std::fs::read(path).map_err(|e| VoxError::io(path, e))?;
            read_stl(&bytes).map_err(|message| VoxError::parse(path, message))?
        }
        "off" => {
            let text = std::fs::read_to_string(path).map_err(|e| VoxError::io(path, e))?;
            read_off(&text).map_err(|message| VoxError::parse(path, message))?
        }
        "obj" => load_obj(path)?,
        _ => return Err(VoxError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(mesh.without_unused_vertices())
}
