//! Top-level generation pipeline.
//!
//! One render pass: validate configuration, build the height field, map the
//! surface, stitch the solid, and hand the result back by value. The
//! pipeline is pure — identical inputs produce byte-identical STL output —
//! and holds no state between requests; callers superseding a stale request
//! simply drop its result.

use tracing::info;

use litho_mesh::{stl_bytes, Mesh, MeshError};

use crate::config::ReliefConfig;
use crate::error::ReliefResult;
use crate::heightfield::{HeightField, Preview};
use crate::pixel::PixelBuffer;
use crate::stitch::stitch;
use crate::surface::map_surface;

/// Result of one render pass.
#[derive(Debug)]
pub struct ReliefOutput {
    /// The watertight lithophane mesh.
    pub mesh: Mesh,
    /// Grid width in cells.
    pub grid_width: usize,
    /// Grid height in cells.
    pub grid_height: usize,
    /// Cells that contributed geometry.
    pub filled_cells: usize,
    /// Silhouette edges closed by wall quads.
    pub boundary_edges: usize,
}

/// Run the full pipeline: image + configuration to watertight mesh.
///
/// Fails with `EmptyMesh` when every cell was cut (fully masked image),
/// rather than returning a silent zero-triangle solid.
pub fn generate(source: &PixelBuffer, cfg: &ReliefConfig) -> ReliefResult<ReliefOutput> {
    cfg.validate()?;

    let field = HeightField::build(source, cfg)?;
    let filled_cells = field.filled_count();
    let vertices = map_surface(&field, cfg);
    let stitched = stitch(&field, vertices);

    if stitched.mesh.is_empty() {
        return Err(MeshError::empty_mesh(
            "every cell was masked or cut; nothing to print",
        )
        .into());
    }

    info!(
        grid_width = field.width(),
        grid_height = field.height(),
        filled_cells,
        triangles = stitched.mesh.face_count(),
        boundary_edges = stitched.boundary_edges,
        "generated lithophane mesh"
    );

    Ok(ReliefOutput {
        grid_width: field.width(),
        grid_height: field.height(),
        filled_cells,
        boundary_edges: stitched.boundary_edges,
        mesh: stitched.mesh,
    })
}

/// Run the pipeline and serialize straight to binary STL bytes.
pub fn generate_stl(
    source: &PixelBuffer,
    cfg: &ReliefConfig,
    name: &str,
) -> ReliefResult<Vec<u8>> {
    let output = generate(source, cfg)?;
    Ok(stl_bytes(&output.mesh, name))
}

/// Derive the preview raster for an image and configuration without
/// building any geometry.
pub fn preview(source: &PixelBuffer, cfg: &ReliefConfig) -> ReliefResult<Preview> {
    let field = HeightField::build(source, cfg)?;
    Ok(field.to_preview())
}
