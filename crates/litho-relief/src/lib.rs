//! Image-to-lithophane geometry pipeline.
//!
//! Converts a raster image into a solid, 3D-printable triangle mesh whose
//! local thickness encodes image luminance, then serializes it to binary
//! STL via `litho-mesh`.
//!
//! The pipeline runs in fixed stages:
//!
//! 1. **Height field** ([`HeightField::build`]): resample, adjust, blur,
//!    quantize luminance into depth levels, and cut holes (background
//!    removal, mounting holes, radial silhouettes, hidden layers).
//! 2. **Border profiles** ([`border`]): decorative height overrides near
//!    the perimeter (flat, rounded, chamfer, frame, oval ring).
//! 3. **Surface mapping** ([`map_surface`]): project each cell onto the
//!    configured parametric shape (flat, cylinder, arc, sphere), producing
//!    paired outer/inner vertices.
//! 4. **Stitching** ([`stitch`]): triangulate filled cells, detect the
//!    silhouette by directed-edge cancellation, and close it with wall
//!    quads into a watertight 2-manifold.
//!
//! # Example
//!
//! ```
//! use litho_relief::{generate_stl, PixelBuffer, ReliefConfig};
//!
//! let image = PixelBuffer::filled(32, 32, [128, 128, 128, 255]);
//! let cfg = ReliefConfig {
//!     width_mm: 32.0,
//!     pixel_size_mm: 1.0,
//!     ..Default::default()
//! };
//! let stl = generate_stl(&image, &cfg, "my-lithophane").unwrap();
//! assert!(stl.len() > 84);
//! ```

pub mod border;
mod config;
mod error;
mod heightfield;
mod pipeline;
mod pixel;
mod stitch;
mod surface;

pub use config::{
    BorderConfig, BorderKind, MountingConfig, ReliefConfig, ShapeConfig, ShapeKind,
};
pub use error::{ReliefError, ReliefResult};
pub use heightfield::{HeightField, Preview, MAX_GRID_CELLS};
pub use pipeline::{generate, generate_stl, preview, ReliefOutput};
pub use pixel::PixelBuffer;
pub use stitch::{stitch, StitchResult};
pub use surface::map_surface;
