#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use voxprep::TriangleMesh;

/// Fresh, empty scratch directory under the cargo target tmpdir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn ascii_stl(mesh: &TriangleMesh) -> String {
    let mut out = String::from("solid fixture\n");
    for [a, b, c] in mesh.triangles() {
        out += "  facet normal 0 0 0\n    outer loop\n";
        for v in [a, b, c] {
            out += &format!("      vertex {} {} {}\n", v.x, v.y, v.z);
        }
        out += "    endloop\n  endfacet\n";
    }
    out += "endsolid fixture\n";
    out
}

pub fn binary_stl(mesh: &TriangleMesh) -> Vec<u8> {
    let mut buf = vec![0u8; 80];
    buf.extend_from_slice(&(mesh.face_count() as u32).to_le_bytes());
    for tri in mesh.triangles() {
        buf.extend_from_slice(&[0u8; 12]);
        for v in tri {
            for c in [v.x, v.y, v.z] {
                buf.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }
    buf
}

pub fn obj_text(mesh: &TriangleMesh) -> String {
    let mut out = String::from("o fixture\n");
    for v in &mesh.vertices {
        out += &format!("v {} {} {}\n", v.x, v.y, v.z);
    }
    for t in mesh.indices.chunks_exact(3) {
        out += &format!("f {} {} {}\n", t[0] + 1, t[1] + 1, t[2] + 1);
    }
    out
}

pub fn off_text(mesh: &TriangleMesh) -> String {
    let mut out = format!("OFF\n{} {} 0\n", mesh.vertices.len(), mesh.face_count());
    for v in &mesh.vertices {
        out += &format!("{} {} {}\n", v.x, v.y, v.z);
    }
    for t in mesh.indices.chunks_exact(3) {
        out += &format!("3 {} {} {}\n", t[0], t[1], t[2]);
    }
    out
}

pub fn write_stl(dir: &Path, name: &str, mesh: &TriangleMesh) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, ascii_stl(mesh)).unwrap();
    path
}

/// Sorted names of the files in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
