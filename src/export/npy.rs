//! NumPy `.npy` export and import.
//!
//! Layout (format version 1.0):
//! ```text
//! [magic: b"\x93NUMPY"]
//! [version: 0x01 0x00]
//! [header_len: u16 LE]
//! [header: ASCII dict, space-padded, '\n'-terminated]
//! [data: C-order cells]
//! ```
//! The header is padded so the data starts on a 64-byte boundary. Version 2.0
//! files (`u32` header length) are accepted on read.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{VoxError, VoxResult};
use crate::voxel::OccupancyGrid;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;

/// Element type written for each cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NpyDtype {
    /// `<f8`: 0.0 / 1.0, what `np.zeros` produces by default.
    #[default]
    F64,
    /// `|u1`: 0 / 1 bytes.
    U8,
    /// `|b1`: NumPy bool.
    Bool,
}

impl NpyDtype {
    /// NumPy `descr` string.
    pub fn descr(self) -> &'static str {
        match self {
            NpyDtype::F64 => "<f8",
            NpyDtype::U8 => "|u1",
            NpyDtype::Bool => "|b1",
        }
    }

    /// Bytes per cell.
    pub fn item_size(self) -> usize {
        match self {
            NpyDtype::F64 => 8,
            NpyDtype::U8 | NpyDtype::Bool => 1,
        }
    }

    fn from_descr(descr: &str) -> Option<Self> {
        match descr {
            "<f8" => Some(NpyDtype::F64),
            "|u1" | "<u1" => Some(NpyDtype::U8),
            "|b1" => Some(NpyDtype::Bool),
            _ => None,
        }
    }
}

fn header_text(dtype: NpyDtype, shape: [usize; 3]) -> String {
    let [nx, ny, nz] = shape;
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': ({nx}, {ny}, {nz}), }}",
        dtype.descr()
    );
    // magic + version + u16 length + dict + '\n', rounded up to ALIGN.
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let pad = (ALIGN - unpadded % ALIGN) % ALIGN;
    format!("{dict}{}\n", " ".repeat(pad))
}

/// Write `grid` as an `.npy` v1.0 stream.
pub fn write_npy<W: Write>(
    grid: &OccupancyGrid,
    dtype: NpyDtype,
    writer: &mut W,
) -> io::Result<()> {
    let header = header_text(dtype, grid.shape());
    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&(header.len() as u16).to_le_bytes())?;
    writer.write_all(header.as_bytes())?;

    match dtype {
        NpyDtype::F64 => {
            for &cell in grid.cells() {
                let v: f64 = if cell { 1.0 } else { 0.0 };
                writer.write_all(&v.to_le_bytes())?;
            }
        }
        NpyDtype::U8 | NpyDtype::Bool => {
            let bytes: Vec<u8> = grid.cells().iter().map(|&c| u8::from(c)).collect();
            writer.write_all(&bytes)?;
        }
    }
    Ok(())
}

/// Write `grid` to a file at `path`, replacing any existing file.
pub fn save_npy(grid: &OccupancyGrid, dtype: NpyDtype, path: &Path) -> VoxResult<()> {
    let file = File::create(path).map_err(|e| VoxError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_npy(grid, dtype, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| VoxError::io(path, e))
}

/// Read a 3D `.npy` array written by [`write_npy`] (or NumPy) back into an
/// occupancy grid. Any non-zero cell counts as occupied.
pub fn read_npy<R: Read>(reader: &mut R) -> VoxResult<OccupancyGrid> {
    let io_err = |e: io::Error| VoxError::Npy(e.to_string());

    let mut preamble = [0u8; 8];
    reader.read_exact(&mut preamble).map_err(io_err)?;
    if &preamble[..6] != MAGIC {
        return Err(VoxError::Npy("bad magic".into()));
    }
    let header_len = match preamble[6] {
        1 => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len).map_err(io_err)?;
            u16::from_le_bytes(len) as usize
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len).map_err(io_err)?;
            u32::from_le_bytes(len) as usize
        }
        v => return Err(VoxError::Npy(format!("unsupported format version {v}"))),
    };

    let header = read_up_to(reader, header_len, "header")?;
    let header = String::from_utf8(header).map_err(|_| VoxError::Npy("header is not text".into()))?;
    let (dtype, shape) = parse_header(&header)?;

    let len = shape
        .iter()
        .try_fold(dtype.item_size(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| VoxError::Npy(format!("shape {shape:?} is too large")))?;
    let data = read_up_to(reader, len, "data")?;

    let cells: Vec<bool> = match dtype {
        NpyDtype::F64 => data
            .chunks_exact(8)
            .map(|b| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(b);
                f64::from_le_bytes(raw) != 0.0
            })
            .collect(),
        NpyDtype::U8 | NpyDtype::Bool => data.iter().map(|&b| b != 0).collect(),
    };
    OccupancyGrid::from_cells(shape, cells)
}

/// Read exactly `len` bytes, growing the buffer as data arrives rather than
/// trusting `len` up front.
fn read_up_to<R: Read>(reader: &mut R, len: usize, what: &str) -> VoxResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| VoxError::Npy(e.to_string()))?;
    if buf.len() != len {
        return Err(VoxError::Npy(format!(
            "truncated {what}: expected {len} bytes, got {}",
            buf.len()
        )));
    }
    Ok(buf)
}

/// Extract dtype and 3D shape from a header dict such as
/// `{'descr': '<f8', 'fortran_order': False, 'shape': (32, 32, 32), }`.
fn parse_header(header: &str) -> VoxResult<(NpyDtype, [usize; 3])> {
    let value_after = |key: &str| {
        header
            .find(key)
            .map(|i| header[i + key.len()..].trim_start_matches([' ', ':']))
            .ok_or_else(|| VoxError::Npy(format!("header missing {key}")))
    };

    let descr = value_after("'descr'")?;
    let descr = descr
        .strip_prefix('\'')
        .and_then(|s| s.split('\'').next())
        .ok_or_else(|| VoxError::Npy("malformed descr".into()))?;
    let dtype = NpyDtype::from_descr(descr)
        .ok_or_else(|| VoxError::Npy(format!("unsupported dtype {descr}")))?;

    if value_after("'fortran_order'")?.starts_with("True") {
        return Err(VoxError::Npy("fortran-order arrays are not supported".into()));
    }

    let shape_text = value_after("'shape'")?;
    let dims = shape_text
        .strip_prefix('(')
        .and_then(|s| s.split(')').next())
        .ok_or_else(|| VoxError::Npy("malformed shape".into()))?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| VoxError::Npy(format!("bad dimension '{s}'"))))
        .collect::<VoxResult<Vec<_>>>()?;
    match dims.as_slice() {
        &[nx, ny, nz] => Ok((dtype, [nx, ny, nz])),
        _ => Err(VoxError::Npy(format!("expected a 3D array, got shape {dims:?}"))),
    }
}
