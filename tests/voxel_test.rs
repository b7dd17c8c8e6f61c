mod common;

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use voxprep::export::{read_npy, NpyDtype};
use voxprep::normalize::NormalizeMode;
use voxprep::primitive::{make_box, make_cube};
use voxprep::voxel::padding_for;
use voxprep::voxel::OccupancyGrid;
use voxprep::{
    BatchReport, BatchVoxelizer, Config, DefaultBackend, MeshBackend, TriangleMesh, VoxError,
    VoxResult,
};

const TETRA_OFF: &str = "OFF\n4 4 0\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n\
                         3 0 2 1\n3 0 1 3\n3 0 3 2\n3 1 2 3\n";

fn voxelizer(cfg: Config) -> BatchVoxelizer<DefaultBackend> {
    BatchVoxelizer::new(cfg, DefaultBackend::default()).unwrap()
}

/// The real backend, except that files named `big*` are not cropped.
#[derive(Default)]
struct UncroppedBig {
    inner: DefaultBackend,
    stem: RefCell<String>,
}

impl MeshBackend for UncroppedBig {
    fn load(&self, path: &Path) -> VoxResult<TriangleMesh> {
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        *self.stem.borrow_mut() = stem;
        self.inner.load(path)
    }

    fn voxelize(&self, mesh: &TriangleMesh, pitch: f64) -> VoxResult<OccupancyGrid> {
        self.inner.voxelize(mesh, pitch)
    }

    fn crop(&self, grid: OccupancyGrid, size: usize) -> OccupancyGrid {
        if self.stem.borrow().starts_with("big") {
            grid
        } else {
            grid.cropped(size)
        }
    }
}

#[test]
fn unit_cube_raw_grid_is_33_then_cropped() {
    let backend = DefaultBackend::default();
    let raw = backend.voxelize(&make_cube(Vector3::zeros(), 2.0), 0.0625).unwrap();
    assert_eq!(raw.shape(), [33, 33, 33]);

    let cropped = backend.crop(raw, 32);
    assert_eq!(cropped.shape(), [32, 32, 32]);
    // Only the low-index faces of the shell survive the crop.
    assert_eq!(cropped.occupied_count(), 32 * 32 * 32 - 31 * 31 * 31);
}

#[test]
fn pipeline_output_is_fixed_size() {
    let vox = voxelizer(Config::default());
    let shapes = [
        make_cube(Vector3::zeros(), 2.0),
        make_cube(Vector3::new(10.0, -4.0, 3.0), 0.3),
        make_box(Vector3::zeros(), Vector3::new(4.0, 1.0, 1.0)),
        make_box(Vector3::new(0.5, 0.0, 0.0), Vector3::new(0.2, 3.0, 0.1)),
    ];
    for mesh in &shapes {
        let grid = vox.process_mesh(mesh).unwrap();
        assert_eq!(grid.shape(), [32, 32, 32]);
        assert!(grid.occupied_count() > 0);
    }
}

#[test]
fn elongated_box_is_padded_on_short_axes() {
    // Normalized to x in [-1, 1], y/z in [-0.25, 0.25]: raw grid 33x9x9.
    let mesh = make_box(Vector3::zeros(), Vector3::new(4.0, 1.0, 1.0));
    let backend = DefaultBackend::default();
    let vox = voxelizer(Config::default());

    let norm = voxprep::normalize::normalize(&mesh, NormalizeMode::Literal).unwrap();
    let raw = backend.voxelize(&norm.mesh, 0.0625).unwrap();
    assert_eq!(raw.shape(), [33, 9, 9]);
    assert_eq!(padding_for(backend.crop(raw, 32).shape(), 32), [0, 11, 11]);

    let grid = vox.process_mesh(&mesh).unwrap();
    assert!(grid.get([0, 11, 11]));
    assert!(!grid.get([0, 10, 11]));
    assert!(grid.get([31, 19, 19]));
    assert!(!grid.get([31, 20, 19]));
}

#[test]
fn real_backend_never_trips_size_guard() {
    let vox = voxelizer(Config::default());
    // Literal normalization leaves off-origin meshes far from the origin;
    // the raw grid is still tight around the surface and the crop bounds it.
    for offset in [0.0, 3.0, 25.0, -140.0] {
        let mesh = make_cube(Vector3::new(offset, offset * 0.5, -offset), 2.0);
        match vox.process_mesh(&mesh) {
            Ok(grid) => assert_eq!(grid.shape(), [32, 32, 32]),
            Err(VoxError::Oversized { .. }) => panic!("guard tripped at offset {offset}"),
            Err(e) => panic!("unexpected error {e}"),
        }
    }
}

#[test]
fn recenter_changes_only_placement() {
    let mesh = make_box(Vector3::new(2.0, 0.0, 0.0), Vector3::new(1.0, 0.5, 0.5));
    let literal = voxelizer(Config::default()).process_mesh(&mesh).unwrap();
    let recentered = voxelizer(Config {
        normalize: NormalizeMode::Recenter,
        ..Config::default()
    })
    .process_mesh(&mesh)
    .unwrap();
    assert_eq!(literal.shape(), recentered.shape());
    assert_eq!(literal.occupied_count(), recentered.occupied_count());
}

#[test]
fn recenter_keeps_counter_and_skips() {
    let root = common::scratch_dir("voxel_recenter_run");
    let src = root.join("in");
    fs::create_dir_all(&src).unwrap();
    common::write_stl(&src, "a.stl", &make_cube(Vector3::new(5.0, -2.0, 1.0), 0.5));
    // Raw grid is 33 voxels per axis in both modes; left uncropped it trips the guard.
    common::write_stl(&src, "big.stl", &make_cube(Vector3::new(3.0, 0.0, 0.0), 2.0));
    fs::write(src.join("c.off"), TETRA_OFF).unwrap();

    let run = |mode: NormalizeMode, out: &str| -> (String, BatchReport) {
        let cfg = Config {
            source_dir: src.clone(),
            dest_dir: root.join(out),
            normalize: mode,
            ..Config::default()
        };
        let vox = BatchVoxelizer::new(cfg, UncroppedBig::default()).unwrap();
        let mut console = Vec::new();
        let report = vox.run(&mut console).unwrap();
        (String::from_utf8(console).unwrap(), report)
    };
    let (literal_text, literal) = run(NormalizeMode::Literal, "literal");
    let (recenter_text, recentered) = run(NormalizeMode::Recenter, "recenter");

    assert_eq!(
        literal_text,
        "Processed: a.stl as 0.npy\n\
         ERROR: Voxel Exceeded 32x32x32. Skipping\n\
         Processed: c.off as 1.npy\n\
         All Done!\n"
    );
    assert_eq!(recenter_text, literal_text);

    let assigned = |r: &BatchReport| -> Vec<(String, usize)> {
        r.processed
            .iter()
            .map(|p| (p.source.file_name().unwrap().to_string_lossy().into_owned(), p.index))
            .collect()
    };
    assert_eq!(assigned(&literal), assigned(&recentered));
    assert_eq!(literal.skipped, vec![src.join("big.stl")]);
    assert_eq!(recentered.skipped, literal.skipped);
    assert_eq!(
        common::file_names(&root.join("recenter")),
        common::file_names(&root.join("literal"))
    );
}

#[test]
fn default_backend_end_to_end() {
    let root = common::scratch_dir("voxel_end_to_end");
    let src = root.join("in");
    fs::create_dir_all(src.join("nested")).unwrap();
    common::write_stl(&src, "cube.stl", &make_cube(Vector3::zeros(), 2.0));
    fs::write(src.join("tetra.off"), TETRA_OFF).unwrap();

    let cfg = Config {
        source_dir: src,
        dest_dir: root.join("out/nested/deeper"),
        dtype: NpyDtype::U8,
        ..Config::default()
    };
    let mut console = Vec::new();
    let report = voxelizer(cfg.clone()).run(&mut console).unwrap();
    assert_eq!(
        String::from_utf8(console).unwrap(),
        "Processed: cube.stl as 0.npy\nProcessed: tetra.off as 1.npy\nAll Done!\n"
    );
    assert_eq!(report.processed.len(), 2);

    let cube = read_npy(&mut fs::File::open(cfg.dest_dir.join("0.npy")).unwrap()).unwrap();
    assert_eq!(cube.shape(), [32, 32, 32]);
    assert_eq!(cube.occupied_count(), 32 * 32 * 32 - 31 * 31 * 31);
    let bytes = fs::read(cfg.dest_dir.join("1.npy")).unwrap();
    assert_eq!(bytes.len(), 128 + 32 * 32 * 32);
    assert!(bytes[128..].iter().all(|&b| b <= 1));
}

#[test]
fn unsupported_file_halts_default_run() {
    let root = common::scratch_dir("voxel_unsupported");
    let src = root.join("in");
    fs::create_dir_all(&src).unwrap();
    common::write_stl(&src, "a.stl", &make_cube(Vector3::zeros(), 2.0));
    fs::write(src.join("readme.txt"), "not a mesh").unwrap();

    let cfg = Config {
        source_dir: src.clone(),
        dest_dir: root.join("out"),
        ..Config::default()
    };
    let err = voxelizer(cfg.clone()).run(&mut Vec::new()).unwrap_err();
    assert!(matches!(err, VoxError::UnsupportedFormat(_)));

    let report = voxelizer(Config { keep_going: true, ..cfg })
        .run(&mut Vec::new())
        .unwrap();
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.failed[0].0, src.join("readme.txt"));
}
