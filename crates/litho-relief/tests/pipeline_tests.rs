//! End-to-end pipeline tests: the concrete scenarios from the design notes
//! plus manifoldness across shapes and serialization round-trips.

use litho_mesh::{read_stl_bytes, stl_bytes, validate_mesh};
use litho_relief::{
    generate, generate_stl, BorderConfig, BorderKind, MountingConfig, PixelBuffer, ReliefConfig,
    ShapeConfig, ShapeKind,
};

fn gray_image(w: u32, h: u32, v: u8) -> PixelBuffer {
    PixelBuffer::filled(w, h, [v, v, v, 255])
}

fn base_config() -> ReliefConfig {
    ReliefConfig {
        layer_count: 2,
        min_height_mm: 0.6,
        max_height_mm: 3.0,
        width_mm: 4.0,
        pixel_size_mm: 1.0,
        base_mm: 0.0,
        ..Default::default()
    }
}

#[test]
fn mid_gray_slab_has_uniform_thickness() {
    // 4x4 all-(128) image, two layers: 128/255 rounds to the upper level,
    // so every cell is 0.6 + 1.0 * 2.4 = 3.0mm thick.
    let output = generate(&gray_image(4, 4, 128), &base_config()).unwrap();

    let (min, max) = output.mesh.bounds().unwrap();
    assert!((max.z - min.z - 3.0).abs() < 1e-9);
    assert!((max.x - min.x - 3.0).abs() < 1e-9);
    assert!((max.y - min.y - 3.0).abs() < 1e-9);

    let report = validate_mesh(&output.mesh);
    assert!(report.is_printable(), "{}", report);
}

#[test]
fn corner_hole_scenario() {
    let full = generate(&gray_image(4, 4, 128), &base_config()).unwrap();

    let mut data = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            let v = if x == 0 && y == 0 { 255 } else { 128 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let img = PixelBuffer::from_rgba(4, 4, data).unwrap();
    let cfg = ReliefConfig {
        background_removal: true,
        background_threshold: 200,
        ..base_config()
    };
    let cut = generate(&img, &cfg).unwrap();

    // Two triangles disappear (one per surface) and the walls track the new
    // rim at two triangles per silhouette edge.
    let full_walls = 2 * full.boundary_edges;
    let cut_walls = 2 * cut.boundary_edges;
    let full_surface = full.mesh.face_count() - full_walls;
    let cut_surface = cut.mesh.face_count() - cut_walls;
    assert_eq!(cut_surface, full_surface - 2);
    assert_eq!(cut.boundary_edges, full.boundary_edges - 1);

    let report = validate_mesh(&cut.mesh);
    assert!(report.is_watertight, "{}", report);
    assert!(report.is_manifold, "{}", report);
}

#[test]
fn flat_border_has_exact_absolute_height() {
    // Border cells must come out at base + depth_mm regardless of the image.
    let cfg = ReliefConfig {
        width_mm: 12.0,
        base_mm: 1.0,
        border: BorderConfig {
            kind: BorderKind::Flat,
            width_mm: 3.0,
            depth_mm: 2.0,
        },
        ..base_config()
    };
    let output = generate(&gray_image(12, 12, 10), &cfg).unwrap();

    let w = output.grid_width;
    let outer_z = |x: usize, y: usize| output.mesh.vertices[2 * (y * w + x)].z;

    for x in 0..w {
        assert!(
            (outer_z(x, 0) - 3.0).abs() < 1e-9,
            "border cell ({}, 0) height {}",
            x,
            outer_z(x, 0)
        );
    }
    assert!((outer_z(2, 2) - 3.0).abs() < 1e-9);
    // Interior keeps the image height: near-black quantizes to the thin
    // level, base + min_height = 1.6.
    assert!((outer_z(6, 6) - 1.6).abs() < 1e-9);
}

#[test]
fn stl_round_trip_preserves_counts_and_positions() {
    let output = generate(&gray_image(6, 6, 90), &base_config()).unwrap();
    let bytes = stl_bytes(&output.mesh, "round-trip");
    let parsed = read_stl_bytes(&bytes).unwrap();

    assert_eq!(parsed.len(), output.mesh.face_count());
    for (raw, tri) in parsed.iter().zip(output.mesh.triangles()) {
        assert_eq!(raw.vertices[0][0], tri.v0.x as f32);
        assert_eq!(raw.vertices[1][1], tri.v1.y as f32);
        assert_eq!(raw.vertices[2][2], tri.v2.z as f32);
    }
}

#[test]
fn pipeline_is_byte_identical_across_runs() {
    let mut data = Vec::new();
    for y in 0..16u32 {
        for x in 0..16u32 {
            let v = ((x * 17 + y * 53) % 256) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let img = PixelBuffer::from_rgba(16, 16, data).unwrap();
    let cfg = ReliefConfig {
        layer_count: 8,
        width_mm: 16.0,
        pixel_size_mm: 1.0,
        background_removal: true,
        background_threshold: 230,
        smoothing: 0.4,
        ..Default::default()
    };

    let a = generate_stl(&img, &cfg, "twice").unwrap();
    let b = generate_stl(&img, &cfg, "twice").unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_shape_yields_a_printable_solid() {
    for kind in [
        ShapeKind::Flat,
        ShapeKind::Cylinder,
        ShapeKind::Arc,
        ShapeKind::Sphere,
        ShapeKind::Circle,
    ] {
        let cfg = ReliefConfig {
            layer_count: 4,
            width_mm: 20.0,
            pixel_size_mm: 1.0,
            shape: ShapeConfig {
                kind,
                angle_degrees: 120.0,
            },
            ..Default::default()
        };
        let output = generate(&gray_image(20, 20, 100), &cfg).unwrap();
        let report = validate_mesh(&output.mesh);
        assert!(
            report.is_watertight && report.is_manifold,
            "shape {:?}: {}",
            kind,
            report
        );
        assert!(
            output.mesh.signed_volume() > 0.0,
            "shape {:?} is inside-out",
            kind
        );
    }
}

#[test]
fn mounting_hole_keeps_mesh_watertight() {
    let cfg = ReliefConfig {
        width_mm: 30.0,
        pixel_size_mm: 1.0,
        mounting: MountingConfig {
            enabled: true,
            diameter_mm: 6.0,
            offset_mm: 6.0,
        },
        ..base_config()
    };
    let full_cfg = ReliefConfig {
        mounting: MountingConfig {
            enabled: false,
            ..cfg.mounting
        },
        ..cfg.clone()
    };

    let with_hole = generate(&gray_image(30, 30, 128), &cfg).unwrap();
    let without = generate(&gray_image(30, 30, 128), &full_cfg).unwrap();

    assert!(with_hole.filled_cells < without.filled_cells);
    assert!(with_hole.boundary_edges > without.boundary_edges);

    let report = validate_mesh(&with_hole.mesh);
    assert!(report.is_watertight, "{}", report);
    assert!(report.is_manifold, "{}", report);
}

#[test]
fn irregular_background_removal_stays_manifold() {
    // Blobby threshold cut across a gradient produces an irregular rim.
    let mut data = Vec::new();
    for y in 0..24u32 {
        for x in 0..24u32 {
            let cx = x as f64 - 11.5;
            let cy = y as f64 - 11.5;
            let v = (255.0 - (cx * cx + cy * cy).sqrt() * 18.0).clamp(0.0, 255.0) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let img = PixelBuffer::from_rgba(24, 24, data).unwrap();
    let cfg = ReliefConfig {
        layer_count: 6,
        width_mm: 24.0,
        pixel_size_mm: 1.0,
        background_removal: true,
        background_threshold: 180,
        invert: true,
        ..Default::default()
    };

    let output = generate(&img, &cfg).unwrap();
    let report = validate_mesh(&output.mesh);
    assert!(report.is_watertight, "{}", report);
    assert!(report.is_manifold, "{}", report);
    assert!(output.mesh.signed_volume() > 0.0);
}

#[test]
fn oval_border_produces_watertight_ring_model() {
    let cfg = ReliefConfig {
        width_mm: 25.0,
        pixel_size_mm: 1.0,
        border: BorderConfig {
            kind: BorderKind::Oval,
            width_mm: 4.0,
            depth_mm: 2.0,
        },
        ..base_config()
    };
    let output = generate(&gray_image(25, 25, 100), &cfg).unwrap();
    let report = validate_mesh(&output.mesh);
    assert!(report.is_watertight, "{}", report);
    assert!(report.is_manifold, "{}", report);

    // Corners were cut, so fewer cells than the full grid.
    assert!(output.filled_cells < output.grid_width * output.grid_height);
}
