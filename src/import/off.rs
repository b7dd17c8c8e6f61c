//! OFF (Object File Format) import.
//!
//! ```text
//! OFF
//! nv nf ne
//! x y z          (nv lines)
//! n i0 i1 ...    (nf lines)
//! ```
//!
//! The counts may share the first line with the `OFF` keyword, as some
//! exporters write `OFF8 6 0`. Polygons are fan-triangulated and any trailing
//! per-face colour values are ignored.

use crate::math::Vector3;
use crate::types::TriangleMesh;

/// Parse OFF text.
pub fn read_off(text: &str) -> Result<TriangleMesh, String> {
    let mut lines = text
        .lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty());

    let first = lines.next().ok_or("empty file")?;
    let rest = first
        .strip_prefix("OFF")
        .ok_or_else(|| format!("expected 'OFF' header, found '{first}'"))?
        .trim();
    let counts_line = if rest.is_empty() {
        lines.next().ok_or("missing element counts")?
    } else {
        rest
    };

    let counts = parse_numbers::<usize>(counts_line)?;
    let [nv, nf] = match counts.as_slice() {
        [nv, nf, ..] => [*nv, *nf],
        _ => return Err(format!("bad element counts '{counts_line}'")),
    };

    let mut vertices = Vec::with_capacity(nv);
    for i in 0..nv {
        let line = lines.next().ok_or_else(|| format!("expected {nv} vertices, found {i}"))?;
        match parse_numbers::<f64>(line)?.as_slice() {
            [x, y, z, ..] => vertices.push(Vector3::new(*x, *y, *z)),
            _ => return Err(format!("vertex {i} has fewer than 3 coordinates")),
        }
    }

    let mut indices = Vec::with_capacity(nf * 3);
    for i in 0..nf {
        let line = lines.next().ok_or_else(|| format!("expected {nf} faces, found {i}"))?;
        let mut fields = line.split_whitespace();
        let n: usize = fields
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| format!("face {i} has no vertex count"))?;
        if n < 3 {
            return Err(format!("face {i} has {n} vertices"));
        }
        let corners = fields
            .take(n)
            .map(|t| t.parse::<u32>().map_err(|_| format!("bad index '{t}' in face {i}")))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() != n {
            return Err(format!("face {i} lists {} of {n} indices", corners.len()));
        }
        for k in 1..n - 1 {
            indices.extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
        }
    }

    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= nv) {
        return Err(format!("face index {bad} out of range for {nv} vertices"));
    }
    Ok(TriangleMesh { vertices, indices })
}

fn parse_numbers<T: std::str::FromStr>(line: &str) -> Result<Vec<T>, String> {
    line.split_whitespace()
        .map(|t| t.parse::<T>().map_err(|_| format!("bad number '{t}'")))
        .collect()
}
