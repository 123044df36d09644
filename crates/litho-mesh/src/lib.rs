//! Triangle mesh foundation for lithophane generation.
//!
//! This crate provides the mesh-side half of the lithophane pipeline:
//!
//! - **Mesh types**: indexed triangle mesh with geometry helpers
//! - **Topology**: directed-edge set with cancelling insertion, used both to
//!   find the silhouette of an open surface and to verify watertightness
//! - **Serialization**: binary STL output (bytes or file) with computed face
//!   normals, plus a reader for round-trip verification
//!
//! # Units and Coordinates
//!
//! Coordinates are millimeters in a right-handed system. Face winding is
//! counter-clockwise viewed from outside, so normals point outward.
//!
//! # Example
//!
//! ```
//! use litho_mesh::{Mesh, stl_bytes, validate_mesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = Mesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! let report = validate_mesh(&mesh);
//! assert_eq!(report.boundary_edge_count, 3); // open triangle
//!
//! let bytes = stl_bytes(&mesh, "example");
//! assert_eq!(bytes.len(), 84 + 50);
//! ```

mod error;
mod stl;
mod topology;
mod types;

pub use error::{MeshError, MeshResult};
pub use stl::{read_stl_bytes, stl_bytes, write_stl, RawTriangle, HEADER_LEN, TRIANGLE_LEN};
pub use topology::{validate_mesh, EdgeSet, MeshReport};
pub use types::{Mesh, Triangle};

impl Mesh {
    /// Validate edge topology and orientation, returning a report.
    pub fn validate(&self) -> MeshReport {
        topology::validate_mesh(self)
    }

    /// Serialize to binary STL bytes.
    pub fn to_stl_bytes(&self, name: &str) -> Vec<u8> {
        stl::stl_bytes(self, name)
    }

    /// Write to a binary STL file.
    pub fn save_stl(&self, path: impl AsRef<std::path::Path>, name: &str) -> MeshResult<()> {
        stl::write_stl(self, path.as_ref(), name)
    }
}
