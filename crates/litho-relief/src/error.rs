//! Error types for the lithophane pipeline.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type ReliefResult<T> = Result<T, ReliefError>;

/// Errors that can occur while turning an image into a lithophane mesh.
///
/// The pipeline is deterministic and pure: every failure is surfaced once as
/// one of these variants, never as silent partial output.
#[derive(Debug, Error, Diagnostic)]
pub enum ReliefError {
    /// Configuration violates a numeric constraint.
    #[error("invalid configuration: {details}")]
    #[diagnostic(
        code(litho::relief::config),
        help(
            "Check parameter constraints: layer_count >= 2, max_height_mm > min_height_mm, width_mm > 0, pixel_size_mm > 0, arc angle in (0, 360]"
        )
    )]
    InvalidConfiguration { details: String },

    /// The requested grid would be too large to allocate safely.
    #[error("grid too large: {width} x {height} = {cells} cells exceeds limit of {max}")]
    #[diagnostic(
        code(litho::relief::grid_too_large),
        help("Increase pixel_size_mm or reduce width_mm to lower the grid resolution")
    )]
    GridTooLarge {
        width: usize,
        height: usize,
        cells: usize,
        max: usize,
    },

    /// The source image could not be decoded or is unusable.
    #[error("image decode failed: {details}")]
    #[diagnostic(
        code(litho::relief::image),
        help("The image may be corrupted or in an unsupported format; try re-exporting it as PNG")
    )]
    ImageDecode { details: String },

    /// Underlying mesh error.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mesh(#[from] litho_mesh::MeshError),
}

impl ReliefError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ReliefError::InvalidConfiguration { .. } => "LITHO-1001",
            ReliefError::GridTooLarge { .. } => "LITHO-1002",
            ReliefError::ImageDecode { .. } => "LITHO-1003",
            ReliefError::Mesh(_) => "LITHO-2001",
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration(details: impl Into<String>) -> Self {
        ReliefError::InvalidConfiguration {
            details: details.into(),
        }
    }

    /// Create a GridTooLarge error.
    pub fn grid_too_large(width: usize, height: usize, max: usize) -> Self {
        ReliefError::GridTooLarge {
            width,
            height,
            cells: width * height,
            max,
        }
    }

    /// Create an ImageDecode error.
    pub fn image_decode(details: impl Into<String>) -> Self {
        ReliefError::ImageDecode {
            details: details.into(),
        }
    }
}
