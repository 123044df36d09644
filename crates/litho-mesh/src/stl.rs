//! Binary STL serialization.
//!
//! Layout: 80-byte header, u32 little-endian triangle count, then 50 bytes
//! per triangle — f32 normal (12), three f32 vertices (36), u16 attribute
//! count (2, always zero). Degenerate triangles are written with a zero
//! normal; readers recompute normals anyway.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{MeshError, MeshResult};
use crate::Mesh;

/// Size of the fixed STL header in bytes.
pub const HEADER_LEN: usize = 80;

/// Bytes per serialized triangle.
pub const TRIANGLE_LEN: usize = 50;

/// Serialize a mesh to binary STL bytes.
///
/// `name` is embedded at the start of the 80-byte header, truncated or
/// zero-padded as needed. Face normals are computed from the winding.
pub fn stl_bytes(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + mesh.face_count() * TRIANGLE_LEN);

    let mut header = [0u8; HEADER_LEN];
    let name_bytes = name.as_bytes();
    let copy_n = name_bytes.len().min(header.len());
    header[..copy_n].copy_from_slice(&name_bytes[..copy_n]);
    out.extend_from_slice(&header);

    out.extend_from_slice(&(mesh.face_count() as u32).to_le_bytes());

    for tri in mesh.triangles() {
        let n = tri.normal().unwrap_or_else(nalgebra::Vector3::zeros);

        out.extend_from_slice(&(n.x as f32).to_le_bytes());
        out.extend_from_slice(&(n.y as f32).to_le_bytes());
        out.extend_from_slice(&(n.z as f32).to_le_bytes());

        for v in [tri.v0, tri.v1, tri.v2] {
            out.extend_from_slice(&(v.x as f32).to_le_bytes());
            out.extend_from_slice(&(v.y as f32).to_le_bytes());
            out.extend_from_slice(&(v.z as f32).to_le_bytes());
        }

        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

/// Write a mesh to a binary STL file.
pub fn write_stl(mesh: &Mesh, path: &Path, name: &str) -> MeshResult<()> {
    if mesh.is_empty() {
        return Err(MeshError::empty_mesh(
            "refusing to write STL with no triangles",
        ));
    }

    let file = File::create(path).map_err(|e| MeshError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);

    let bytes = stl_bytes(mesh, name);
    writer
        .write_all(&bytes)
        .map_err(|e| MeshError::io_write(path, e))?;
    writer.flush().map_err(|e| MeshError::io_write(path, e))?;

    info!("wrote {} triangles to {:?}", mesh.face_count(), path);

    Ok(())
}

/// A triangle as stored in a binary STL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTriangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

/// Parse binary STL bytes back into raw triangles.
///
/// Used for round-trip verification; tolerates trailing garbage after the
/// declared triangle count but not truncation.
pub fn read_stl_bytes(bytes: &[u8]) -> MeshResult<Vec<RawTriangle>> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(MeshError::parse(format!(
            "buffer too short for STL header: {} bytes",
            bytes.len()
        )));
    }

    let count = u32::from_le_bytes(
        bytes[HEADER_LEN..HEADER_LEN + 4]
            .try_into()
            .expect("4-byte slice"),
    ) as usize;

    let needed = HEADER_LEN + 4 + count * TRIANGLE_LEN;
    if bytes.len() < needed {
        return Err(MeshError::parse(format!(
            "declared {} triangles but buffer holds {} bytes (need {})",
            count,
            bytes.len(),
            needed
        )));
    }

    let mut triangles = Vec::with_capacity(count);
    let mut offset = HEADER_LEN + 4;

    let read_vec3 = |bytes: &[u8], at: usize| -> [f32; 3] {
        [
            f32::from_le_bytes(bytes[at..at + 4].try_into().expect("4-byte slice")),
            f32::from_le_bytes(bytes[at + 4..at + 8].try_into().expect("4-byte slice")),
            f32::from_le_bytes(bytes[at + 8..at + 12].try_into().expect("4-byte slice")),
        ]
    };

    for _ in 0..count {
        let normal = read_vec3(bytes, offset);
        let vertices = [
            read_vec3(bytes, offset + 12),
            read_vec3(bytes, offset + 24),
            read_vec3(bytes, offset + 36),
        ];
        triangles.push(RawTriangle { normal, vertices });
        offset += TRIANGLE_LEN;
    }

    Ok(triangles)
}
