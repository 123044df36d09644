//! Directed-edge bookkeeping and watertightness checks.
//!
//! The central structure here is [`EdgeSet`], a set of directed vertex-index
//! pairs with cancelling insertion: adding an edge whose reverse is already
//! present removes both. Feeding it every directed edge of a consistently
//! wound triangle soup leaves exactly the topological boundary — interior
//! edges appear once per orientation and cancel, silhouette edges survive.
//! This works for arbitrarily irregular, multiply-holed regions.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::{debug, warn};

use crate::Mesh;

/// A set of directed edges with XOR-style insertion.
#[derive(Debug, Default)]
pub struct EdgeSet {
    edges: HashSet<(u32, u32)>,
}

impl EdgeSet {
    /// Create an empty edge set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an edge set with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a directed edge, cancelling against its reverse.
    ///
    /// If `(b, a)` is present it is removed (the undirected edge was interior
    /// and shared by two consistently wound triangles); otherwise `(a, b)` is
    /// recorded as a boundary candidate.
    pub fn insert(&mut self, a: u32, b: u32) {
        if !self.edges.remove(&(b, a)) {
            self.edges.insert((a, b));
        }
    }

    /// Insert all three directed edges of a triangle.
    pub fn insert_triangle(&mut self, face: [u32; 3]) {
        self.insert(face[0], face[1]);
        self.insert(face[1], face[2]);
        self.insert(face[2], face[0]);
    }

    /// Number of surviving directed edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check whether no edges survive (the surface is closed).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over the surviving directed edges.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges.iter().copied()
    }

    /// Consume the set, returning the surviving edges.
    pub fn into_edges(self) -> Vec<(u32, u32)> {
        self.edges.into_iter().collect()
    }
}

/// Validation report for a mesh.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Whether every edge is traversed equally in both directions — the
    /// directed-edge set over all faces cancels to empty, so the surface
    /// closes around a volume.
    pub is_watertight: bool,

    /// Whether all edges have at most 2 adjacent faces.
    pub is_manifold: bool,

    /// Number of boundary edges (edges with 1 adjacent face).
    pub boundary_edge_count: usize,

    /// Number of non-manifold edges (edges with >2 adjacent faces).
    pub non_manifold_edge_count: usize,

    /// Number of edges traversed unequally per direction (open or
    /// winding-flipped).
    pub unbalanced_edge_count: usize,

    /// Total vertex count.
    pub vertex_count: usize,

    /// Total face count.
    pub face_count: usize,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,

    /// Signed volume (positive = outward normals). Only meaningful when
    /// watertight.
    pub signed_volume: f64,

    /// Whether the mesh appears inside-out (negative signed volume).
    pub is_inside_out: bool,
}

impl MeshReport {
    /// Check if mesh is suitable for 3D printing: watertight, manifold,
    /// normals outward.
    pub fn is_printable(&self) -> bool {
        self.is_watertight && self.is_manifold && !self.is_inside_out
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        writeln!(f, "  Volume: {:.2} (signed)", self.signed_volume)?;
        writeln!(
            f,
            "  Watertight: {} (boundary edges: {}, unbalanced: {})",
            if self.is_watertight { "yes" } else { "NO" },
            self.boundary_edge_count,
            self.unbalanced_edge_count
        )?;
        writeln!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            if self.is_manifold { "yes" } else { "NO" },
            self.non_manifold_edge_count
        )?;
        writeln!(
            f,
            "  Printable: {}",
            if self.is_printable() { "yes" } else { "NO" }
        )?;

        Ok(())
    }
}

/// Validate a mesh's edge topology and orientation, returning a report.
///
/// Counts, for every undirected edge, how many faces traverse it in each
/// direction. A closed 2-manifold with consistent winding has exactly one
/// traversal per direction on every edge.
pub fn validate_mesh(mesh: &Mesh) -> MeshReport {
    // (forward, reverse) traversal counts keyed by the sorted vertex pair
    let mut edge_counts: HashMap<(u32, u32), (u32, u32)> =
        HashMap::with_capacity(mesh.faces.len() * 3 / 2);

    for face in &mesh.faces {
        for (a, b) in [
            (face[0], face[1]),
            (face[1], face[2]),
            (face[2], face[0]),
        ] {
            let entry = if a < b {
                &mut edge_counts.entry((a, b)).or_insert((0, 0)).0
            } else {
                &mut edge_counts.entry((b, a)).or_insert((0, 0)).1
            };
            *entry += 1;
        }
    }

    let mut boundary_edge_count = 0;
    let mut non_manifold_edge_count = 0;
    let mut unbalanced_edge_count = 0;

    for &(fwd, rev) in edge_counts.values() {
        let total = fwd + rev;
        if total == 1 {
            boundary_edge_count += 1;
        }
        if total > 2 {
            non_manifold_edge_count += 1;
        }
        if fwd != rev {
            unbalanced_edge_count += 1;
        }
    }

    let signed_volume = mesh.signed_volume();
    let report = MeshReport {
        is_watertight: unbalanced_edge_count == 0,
        is_manifold: non_manifold_edge_count == 0,
        boundary_edge_count,
        non_manifold_edge_count,
        unbalanced_edge_count,
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        bounds: mesh.bounds(),
        signed_volume,
        is_inside_out: signed_volume < 0.0,
    };

    if !report.is_watertight {
        warn!(
            "mesh is not watertight: {} boundary edges, {} unbalanced edges",
            boundary_edge_count, unbalanced_edge_count
        );
    }
    if !report.is_manifold {
        warn!(
            "mesh is not manifold: {} non-manifold edges",
            non_manifold_edge_count
        );
    }
    debug!(
        vertices = report.vertex_count,
        faces = report.face_count,
        watertight = report.is_watertight,
        "validated mesh"
    );

    report
}
