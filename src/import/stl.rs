//! STL import (binary and ASCII).
//!
//! Binary layout: an 80-byte header, a little-endian `u32` triangle count,
//! then 50 bytes per triangle (normal, three vertices as `f32` triples, and a
//! `u16` attribute). A file whose length matches that layout exactly is read
//! as binary; anything else is parsed as ASCII `solid … endsolid` text.
//!
//! STL stores every triangle corner separately. Corners with bit-identical
//! positions are welded into one vertex.

use std::collections::HashMap;

use crate::math::Vector3;
use crate::types::TriangleMesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse an STL file from memory.
pub fn read_stl(bytes: &[u8]) -> Result<TriangleMesh, String> {
    if is_binary(bytes) {
        read_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| "not a binary STL and not valid ASCII".to_string())?;
        read_ascii(text)
    }
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(FACET_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        == Some(bytes.len())
}

#[derive(Default)]
struct Welder {
    vertices: Vec<Vector3>,
    indices: Vec<u32>,
    lookup: HashMap<[u64; 3], u32>,
}

impl Welder {
    fn push(&mut self, p: Vector3) {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        let vertices = &mut self.vertices;
        let index = *self.lookup.entry(key).or_insert_with(|| {
            vertices.push(p);
            (vertices.len() - 1) as u32
        });
        self.indices.push(index);
    }

    fn finish(self) -> TriangleMesh {
        TriangleMesh {
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}

fn read_binary(bytes: &[u8]) -> Result<TriangleMesh, String> {
    let f32_at = |off: usize| {
        f64::from(f32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]))
    };

    let mut welder = Welder::default();
    for facet in (HEADER_LEN + 4..bytes.len()).step_by(FACET_LEN) {
        // Skip the 12-byte facet normal; it is recomputed from winding when needed.
        for corner in 0..3 {
            let off = facet + 12 + corner * 12;
            let p = Vector3::new(f32_at(off), f32_at(off + 4), f32_at(off + 8));
            if !p.iter().all(|c| c.is_finite()) {
                let n = (facet - HEADER_LEN - 4) / FACET_LEN;
                return Err(format!("non-finite vertex in facet {n}"));
            }
            welder.push(p);
        }
    }
    Ok(welder.finish())
}

fn read_ascii(text: &str) -> Result<TriangleMesh, String> {
    let first_word = |line: &str| line.split_whitespace().next().map(str::to_ascii_lowercase);
    if text.lines().find_map(first_word).as_deref() != Some("solid") {
        return Err("missing 'solid' keyword".into());
    }

    // Solid names are free text and may contain keywords; skip those lines whole.
    let mut tokens = text
        .lines()
        .filter(|line| !matches!(first_word(*line).as_deref(), Some("solid" | "endsolid")))
        .flat_map(str::split_whitespace);

    let mut welder = Welder::default();
    let mut polygon: Vec<Vector3> = Vec::new();
    let mut in_loop = false;
    while let Some(tok) = tokens.next() {
        match tok.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                polygon.clear();
            }
            "vertex" => {
                if !in_loop {
                    return Err("vertex outside of 'outer loop'".into());
                }
                let mut coord = || -> Result<f64, String> {
                    let t = tokens.next().ok_or("truncated vertex")?;
                    t.parse::<f64>().map_err(|_| format!("bad coordinate '{t}'"))
                };
                polygon.push(Vector3::new(coord()?, coord()?, coord()?));
            }
            "endloop" => {
                if polygon.len() < 3 {
                    return Err(format!("facet with {} vertices", polygon.len()));
                }
                for i in 1..polygon.len() - 1 {
                    welder.push(polygon[0]);
                    welder.push(polygon[i]);
                    welder.push(polygon[i + 1]);
                }
                in_loop = false;
            }
            _ => {}
        }
    }
    if in_loop {
        return Err("unterminated 'outer loop'".into());
    }
    Ok(welder.finish())
}
