//! Height field construction.
//!
//! Turns a pixel buffer plus configuration into a grid of normalized depth
//! values with hole sentinels. The transform order is fixed: resample,
//! brightness/contrast/gamma, box blur, luminance, background removal,
//! quantization, inversion, mounting hole, radial silhouette, border
//! shaping, layer visibility. Holes always win over borders, and visibility
//! is indexed by the final physical height level.

use tracing::{debug, warn};

use crate::border;
use crate::config::{BorderKind, ReliefConfig, ShapeKind};
use crate::error::{ReliefError, ReliefResult};
use crate::pixel::PixelBuffer;

/// Hard cap on grid cells, checked before any allocation.
pub const MAX_GRID_CELLS: usize = 16_000_000;

/// A 2D grid of normalized depth values.
///
/// Cells are `None` for holes (masked, cut, or background-removed) or
/// `Some(depth)` with depth normally in [0, 1]. Border profiles may push
/// depth outside that range on purpose, so the profile can stand proud of
/// the image surface. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    cells: Vec<Option<f64>>,
}

impl HeightField {
    /// Build a height field from a source image and configuration.
    pub fn build(source: &PixelBuffer, cfg: &ReliefConfig) -> ReliefResult<HeightField> {
        cfg.validate()?;

        let (width, height) = cfg.grid_dims(source.width(), source.height());
        if width * height > MAX_GRID_CELLS {
            return Err(ReliefError::grid_too_large(width, height, MAX_GRID_CELLS));
        }

        debug!(
            grid_width = width,
            grid_height = height,
            "building height field"
        );

        let resampled = source.resample(width as u32, height as u32);
        let adjusted = resampled.adjust(cfg.brightness, cfg.contrast, cfg.gamma);
        let blurred = adjusted.box_blur(cfg.smoothing_radius());

        let levels = cfg.layer_count as usize;
        let step = 1.0 / (levels - 1) as f64;
        let visibility = effective_visibility(cfg);

        // Mounting hole center and radius, in cells from the top edge.
        let mount = cfg.mounting.enabled.then(|| {
            (
                width as f64 / 2.0,
                cfg.mounting.offset_mm / cfg.pixel_size_mm,
                cfg.mounting.diameter_mm / 2.0 / cfg.pixel_size_mm,
            )
        });

        let cut_radial =
            cfg.shape.kind == ShapeKind::Circle || cfg.border.kind == BorderKind::Oval;
        let border_px = (cfg.border.width_mm / cfg.pixel_size_mm).round() as usize;
        // Oval band width mapped into the [-1, 1] ellipse metric, against
        // the shorter half-extent.
        let band_uv = 2.0 * border_px as f64 / (width.min(height) - 1) as f64;
        let span = cfg.height_span_mm();

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(build_cell(
                    &blurred, cfg, x, y, width, height, step, levels, mount, cut_radial, border_px,
                    band_uv, span, visibility,
                ));
            }
        }

        let field = HeightField {
            width,
            height,
            cells,
        };
        debug!(
            filled = field.filled_count(),
            holes = width * height - field.filled_count(),
            "height field complete"
        );
        Ok(field)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Depth at (x, y), or None for holes.
    #[inline]
    pub fn depth(&self, x: usize, y: usize) -> Option<f64> {
        self.cells[y * self.width + x]
    }

    /// Whether the cell at (x, y) is part of the model.
    #[inline]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x].is_some()
    }

    /// Flat cell slice, row-major.
    #[inline]
    pub fn cells(&self) -> &[Option<f64>] {
        &self.cells
    }

    /// Number of non-hole cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Derive the grayscale+alpha preview raster (alpha 0 for holes).
    pub fn to_preview(&self) -> Preview {
        let mut data = Vec::with_capacity(self.cells.len() * 2);
        for cell in &self.cells {
            match cell {
                Some(depth) => {
                    data.push((depth.clamp(0.0, 1.0) * 255.0).round() as u8);
                    data.push(255);
                }
                None => {
                    data.push(0);
                    data.push(0);
                }
            }
        }
        Preview {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Low-resolution grayscale+alpha view of a height field, for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: usize,
    pub height: usize,
    /// Interleaved luma/alpha bytes, row-major.
    pub data: Vec<u8>,
}

/// Resolve the visibility mask: empty means all visible, and a stale length
/// from the caller degrades to all visible rather than failing the pass.
fn effective_visibility(cfg: &ReliefConfig) -> Option<&[bool]> {
    if cfg.layer_visibility.is_empty() {
        None
    } else if cfg.layer_visibility.len() != cfg.layer_count as usize {
        warn!(
            expected = cfg.layer_count,
            got = cfg.layer_visibility.len(),
            "layer_visibility length mismatch, treating all layers as visible"
        );
        None
    } else {
        Some(&cfg.layer_visibility)
    }
}

#[allow(clippy::too_many_arguments)]
fn build_cell(
    pixels: &PixelBuffer,
    cfg: &ReliefConfig,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    step: f64,
    levels: usize,
    mount: Option<(f64, f64, f64)>,
    cut_radial: bool,
    border_px: usize,
    band_uv: f64,
    span: f64,
    visibility: Option<&[bool]>,
) -> Option<f64> {
    let lum = pixels.luminance(x as u32, y as u32);

    if cfg.background_removal && lum > cfg.background_threshold as f64 {
        return None;
    }

    // Quantize to the nearest of `levels` evenly spaced heights. round()
    // is half-away-from-zero, so mid-gray (128/255) lands on the upper
    // level when levels == 2.
    let layer = ((lum / 255.0) / step).round();
    let val = layer * step;
    let mut depth = if cfg.invert { 1.0 - val } else { val };

    if let Some((cx, cy, radius)) = mount {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if (dx * dx + dy * dy).sqrt() < radius {
            return None;
        }
    }

    let d = if cut_radial {
        let d = border::oval_metric(x, y, width, height);
        if d > 1.0 {
            return None;
        }
        d
    } else {
        0.0
    };

    match cfg.border.kind {
        BorderKind::None => {}
        BorderKind::Oval => {
            if let Some(t) = border::oval_t(d, band_uv) {
                let z = border::profile_z(BorderKind::Oval, t, cfg.border.depth_mm);
                depth = (z - cfg.min_height_mm) / span;
            }
        }
        kind => {
            if let Some(t) = border::edge_t(x, y, width, height, border_px) {
                let z = border::profile_z(kind, t, cfg.border.depth_mm);
                depth = (z - cfg.min_height_mm) / span;
            }
        }
    }

    if let Some(vis) = visibility {
        let level = (depth * (levels - 1) as f64)
            .round()
            .clamp(0.0, (levels - 1) as f64) as usize;
        if !vis[level] {
            return None;
        }
    }

    Some(depth)
}
