//! Boundary stitching.
//!
//! Builds the closed solid from the filled-cell grid and the interleaved
//! vertex buffer. Every 2x2 cell block contributes up to two triangles per
//! surface, gated per diagonal on all three involved cells being filled, so
//! hole rims of any shape triangulate cleanly. Outer-triangle edges pass
//! through an [`EdgeSet`] with cancelling insertion; the edges that survive
//! are the true silhouette (outer rim plus every hole rim), and each one
//! receives a wall quad down to the paired inner vertices. The result is a
//! single watertight, consistently wound 2-manifold.

use nalgebra::Point3;
use tracing::debug;

use litho_mesh::{EdgeSet, Mesh};

use crate::heightfield::HeightField;

/// Result of stitching, with face-count bookkeeping for callers and tests.
#[derive(Debug)]
pub struct StitchResult {
    pub mesh: Mesh,
    /// Triangles on the outer (image) surface.
    pub outer_triangles: usize,
    /// Triangles on the inner (base) surface. Always equals `outer_triangles`.
    pub inner_triangles: usize,
    /// Silhouette edges that received wall quads.
    pub boundary_edges: usize,
    /// Wall triangles; always `2 * boundary_edges`.
    pub wall_triangles: usize,
}

/// Stitch the filled cells of `field` over the vertex buffer from the
/// surface mapper into a watertight mesh.
///
/// `vertices` must hold exactly two entries per grid cell, interleaved as
/// `2c` (outer) / `2c + 1` (inner).
pub fn stitch(field: &HeightField, vertices: Vec<Point3<f64>>) -> StitchResult {
    let width = field.width();
    let height = field.height();
    debug_assert_eq!(vertices.len(), 2 * width * height);

    let blocks = (width - 1) * (height - 1);
    let mut mesh = Mesh {
        vertices,
        faces: Vec::with_capacity(blocks * 4),
    };
    let mut edges = EdgeSet::with_capacity(width * 4 + height * 4);

    let outer = |x: usize, y: usize| 2 * (y * width + x) as u32;

    let mut outer_triangles = 0;
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let f00 = field.is_filled(x, y);
            let f10 = field.is_filled(x + 1, y);
            let f01 = field.is_filled(x, y + 1);
            let f11 = field.is_filled(x + 1, y + 1);

            // First diagonal half: upper-left, lower-left, upper-right.
            if f00 && f01 && f10 {
                let tri = [outer(x, y), outer(x, y + 1), outer(x + 1, y)];
                edges.insert_triangle(tri);
                mesh.faces.push(tri);
                mesh.faces.push([tri[0] + 1, tri[2] + 1, tri[1] + 1]);
                outer_triangles += 1;
            }
            // Second diagonal half: upper-right, lower-left, lower-right.
            if f10 && f01 && f11 {
                let tri = [outer(x + 1, y), outer(x, y + 1), outer(x + 1, y + 1)];
                edges.insert_triangle(tri);
                mesh.faces.push(tri);
                mesh.faces.push([tri[0] + 1, tri[2] + 1, tri[1] + 1]);
                outer_triangles += 1;
            }
        }
    }

    // Wall quads close every surviving silhouette edge against the paired
    // inner vertices. Sorted for run-to-run byte-identical output.
    let mut boundary = edges.into_edges();
    boundary.sort_unstable();

    for &(u, v) in &boundary {
        mesh.faces.push([u, u + 1, v + 1]);
        mesh.faces.push([u, v + 1, v]);
    }

    let boundary_edges = boundary.len();
    debug!(
        outer_triangles,
        boundary_edges,
        total_faces = mesh.face_count(),
        "stitched mesh"
    );

    StitchResult {
        mesh,
        outer_triangles,
        inner_triangles: outer_triangles,
        boundary_edges,
        wall_triangles: 2 * boundary_edges,
    }
}
