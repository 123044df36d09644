//! Parametric surface mapping.
//!
//! Projects each grid cell into 3D under the configured shape, producing an
//! interleaved vertex buffer: the cell at flat index `c` owns vertices
//! `2c` (outer surface, at full thickness) and `2c + 1` (inner surface, at
//! the shape's base). Hole cells still emit both vertices so indices stay
//! grid-addressable; no triangle ever references them.
//!
//! The per-cell work has no cross-cell dependency, so the pass fans out
//! over rayon and collects in index order.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::config::{ReliefConfig, ShapeKind};
use crate::heightfield::HeightField;

/// Map every cell of the height field to its outer/inner vertex pair.
///
/// Thickness is `base + min_height + depth * (max - min)`; hole cells
/// degrade to `base` for bookkeeping only.
pub fn map_surface(field: &HeightField, cfg: &ReliefConfig) -> Vec<Point3<f64>> {
    let width = field.width();
    let height = field.height();
    let span = cfg.height_span_mm();
    let angle_rad = cfg.shape.angle_degrees.to_radians();

    (0..width * height)
        .into_par_iter()
        .flat_map_iter(|idx| {
            let x = idx % width;
            let y = idx / width;
            let thickness = match field.depth(x, y) {
                Some(depth) => cfg.base_mm + cfg.min_height_mm + depth * span,
                None => cfg.base_mm,
            };
            let (outer, inner) = project(cfg, x, y, width, height, thickness, angle_rad);
            [outer, inner]
        })
        .collect()
}

/// Project one cell under the configured shape.
fn project(
    cfg: &ReliefConfig,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    thickness: f64,
    angle_rad: f64,
) -> (Point3<f64>, Point3<f64>) {
    let u = x as f64 / (width - 1) as f64;
    let v = y as f64 / (height - 1) as f64;
    // Centered physical position; image row 0 maps to +y.
    let xm = (x as f64 - (width - 1) as f64 / 2.0) * cfg.pixel_size_mm;
    let ym = ((height - 1) as f64 / 2.0 - y as f64) * cfg.pixel_size_mm;

    match cfg.shape.kind {
        ShapeKind::Flat | ShapeKind::Circle => (
            Point3::new(xm, ym, thickness),
            Point3::new(xm, ym, 0.0),
        ),
        ShapeKind::Cylinder => {
            // width_mm is the circumference. theta runs clockwise so the
            // image reads unmirrored from outside and normals stay outward.
            let radius = cfg.width_mm / TAU;
            let theta = -u * TAU;
            (
                cylindrical(radius + thickness, theta, ym),
                cylindrical(radius, theta, ym),
            )
        }
        ShapeKind::Arc => {
            // width_mm is the arc length over angle_rad, centered and
            // rotated to face the viewer.
            let radius = cfg.width_mm / angle_rad;
            let theta = -(u - 0.5) * angle_rad - FRAC_PI_2;
            (
                cylindrical(radius + thickness, theta, ym),
                cylindrical(radius, theta, ym),
            )
        }
        ShapeKind::Sphere => {
            let radius = cfg.width_mm / TAU;
            let theta = u * TAU;
            let phi = v * PI;
            let dir = nalgebra::Vector3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
            (
                Point3::from(dir * (radius + thickness)),
                Point3::from(dir * radius),
            )
        }
    }
}

#[inline]
fn cylindrical(radius: f64, theta: f64, y: f64) -> Point3<f64> {
    Point3::new(radius * theta.cos(), y, radius * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeConfig;
    use crate::pixel::PixelBuffer;

    fn field_4x4(cfg: &ReliefConfig) -> HeightField {
        let img = PixelBuffer::filled(4, 4, [128, 128, 128, 255]);
        HeightField::build(&img, cfg).unwrap()
    }

    fn base_config(kind: ShapeKind) -> ReliefConfig {
        ReliefConfig {
            layer_count: 2,
            min_height_mm: 0.6,
            max_height_mm: 3.0,
            width_mm: 4.0,
            pixel_size_mm: 1.0,
            base_mm: 0.5,
            shape: ShapeConfig {
                kind,
                angle_degrees: 120.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_vertex_pairing_and_count() {
        let cfg = base_config(ShapeKind::Flat);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);
        assert_eq!(vertices.len(), 2 * 16);
    }

    #[test]
    fn test_flat_thickness_and_base_plane() {
        let cfg = base_config(ShapeKind::Flat);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        // depth 1.0 everywhere: T = 0.5 + 0.6 + 2.4 = 3.5
        for cell in 0..16 {
            assert!((vertices[2 * cell].z - 3.5).abs() < 1e-12);
            assert_eq!(vertices[2 * cell + 1].z, 0.0);
        }
    }

    #[test]
    fn test_flat_is_centered() {
        let cfg = base_config(ShapeKind::Flat);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        let sum_x: f64 = vertices.iter().map(|p| p.x).sum();
        let sum_y: f64 = vertices.iter().map(|p| p.y).sum();
        assert!(sum_x.abs() < 1e-9);
        assert!(sum_y.abs() < 1e-9);

        // Image row 0 sits at +y.
        assert!(vertices[0].y > 0.0);
    }

    #[test]
    fn test_cylinder_radii() {
        let cfg = base_config(ShapeKind::Cylinder);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        let base_radius = cfg.width_mm / TAU;
        for cell in 0..16 {
            let outer = vertices[2 * cell];
            let inner = vertices[2 * cell + 1];
            let r_outer = (outer.x * outer.x + outer.z * outer.z).sqrt();
            let r_inner = (inner.x * inner.x + inner.z * inner.z).sqrt();
            assert!((r_outer - (base_radius + 3.5)).abs() < 1e-9);
            assert!((r_inner - base_radius).abs() < 1e-9);
            assert_eq!(outer.y, inner.y);
        }
    }

    #[test]
    fn test_arc_radius_from_arc_length() {
        let cfg = base_config(ShapeKind::Arc);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        let angle = 120.0f64.to_radians();
        let base_radius = cfg.width_mm / angle;
        let inner = vertices[1];
        let r_inner = (inner.x * inner.x + inner.z * inner.z).sqrt();
        assert!((r_inner - base_radius).abs() < 1e-9);
    }

    #[test]
    fn test_arc_faces_viewer() {
        let cfg = base_config(ShapeKind::Arc);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        // The horizontal center of the arc bulges toward -z.
        for cell in 0..16 {
            assert!(vertices[2 * cell].z < 0.0);
        }
    }

    #[test]
    fn test_sphere_radii_from_origin() {
        let cfg = base_config(ShapeKind::Sphere);
        let field = field_4x4(&cfg);
        let vertices = map_surface(&field, &cfg);

        let base_radius = cfg.width_mm / TAU;
        for cell in 0..16 {
            let outer = vertices[2 * cell].coords.norm();
            let inner = vertices[2 * cell + 1].coords.norm();
            assert!((outer - (base_radius + 3.5)).abs() < 1e-9);
            assert!((inner - base_radius).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hole_cells_emit_base_thickness() {
        let cfg = ReliefConfig {
            background_removal: true,
            background_threshold: 100,
            ..base_config(ShapeKind::Flat)
        };
        let img = PixelBuffer::filled(4, 4, [200, 200, 200, 255]);
        let field = HeightField::build(&img, &cfg).unwrap();
        assert_eq!(field.filled_count(), 0);

        let vertices = map_surface(&field, &cfg);
        assert_eq!(vertices.len(), 32);
        for cell in 0..16 {
            assert!((vertices[2 * cell].z - cfg.base_mm).abs() < 1e-12);
        }
    }
}
