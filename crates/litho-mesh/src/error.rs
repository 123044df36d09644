//! Error types for mesh operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur during mesh construction and serialization.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error writing a mesh file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(litho::mesh::io_write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed binary STL data.
    #[error("failed to parse binary STL: {details}")]
    #[diagnostic(
        code(litho::mesh::parse),
        help("The buffer may be truncated or not a binary STL file")
    )]
    Parse { details: String },

    /// Mesh has no vertices or faces where geometry is required.
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(litho::mesh::empty),
        help("The mesh must have at least one vertex and one face")
    )]
    EmptyMesh { details: String },
}

impl MeshError {
    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(details: impl Into<String>) -> Self {
        MeshError::Parse {
            details: details.into(),
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::parse("triangle count mismatch");
        let display = format!("{}", err);
        assert!(display.contains("triangle count mismatch"));
    }

    #[test]
    fn test_io_write_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = MeshError::io_write("/tmp/out.stl", io);
        let display = format!("{}", err);
        assert!(display.contains("/tmp/out.stl"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
