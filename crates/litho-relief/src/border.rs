//! Border height profiles.
//!
//! A border is a height override applied near the image perimeter. The
//! profile is a pure function of the normalized distance-to-edge
//! `t in [0, 1]` (0 at the outer edge, 1 at the inner boundary of the band)
//! and the configured peak depth in mm. Rectangular kinds measure `t` from
//! the nearest grid edge; the oval kind measures it radially inside an
//! elliptical ring.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::BorderKind;

/// Absolute border height Z(t) in mm for a profile kind.
///
/// `Frame` is piecewise over four bands: a flat lip, a cosine groove down to
/// 0.8·depth, a sinusoidal bead back up to depth, and a linear taper from
/// 0.6·depth to zero.
pub fn profile_z(kind: BorderKind, t: f64, depth_mm: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match kind {
        BorderKind::None => 0.0,
        BorderKind::Flat => depth_mm,
        BorderKind::Rounded | BorderKind::Oval => depth_mm * (t * FRAC_PI_2).cos(),
        BorderKind::Chamfer => depth_mm * (1.0 - t),
        BorderKind::Frame => {
            if t < 0.2 {
                depth_mm
            } else if t < 0.4 {
                // groove: cosine descent from depth to 0.8*depth
                let s = (t - 0.2) / 0.2;
                depth_mm * (0.9 + 0.1 * (s * PI).cos())
            } else if t < 0.8 {
                // bead: quarter sine rising back to depth
                let s = (t - 0.4) / 0.4;
                depth_mm * (0.8 + 0.2 * (s * FRAC_PI_2).sin())
            } else {
                let s = (t - 0.8) / 0.2;
                depth_mm * 0.6 * (1.0 - s)
            }
        }
    }
}

/// Distance from cell (x, y) to the nearest grid edge, in cells.
#[inline]
pub fn edge_distance(x: usize, y: usize, width: usize, height: usize) -> usize {
    let dx = x.min(width - 1 - x);
    let dy = y.min(height - 1 - y);
    dx.min(dy)
}

/// Normalized distance-to-edge for a rectangular band of `border_px` cells,
/// or None when the cell lies inside the image proper.
pub fn edge_t(x: usize, y: usize, width: usize, height: usize, border_px: usize) -> Option<f64> {
    if border_px == 0 {
        return None;
    }
    let dist = edge_distance(x, y, width, height);
    if dist < border_px {
        Some(dist as f64 / border_px as f64)
    } else {
        None
    }
}

/// Elliptical metric `d = sqrt(u^2 + v^2)` with u, v in [-1, 1] across the
/// grid: 0 at the center, 1 on the inscribed ellipse.
#[inline]
pub fn oval_metric(x: usize, y: usize, width: usize, height: usize) -> f64 {
    let u = 2.0 * x as f64 / (width - 1) as f64 - 1.0;
    let v = 2.0 * y as f64 / (height - 1) as f64 - 1.0;
    (u * u + v * v).sqrt()
}

/// Radial `t` for the oval ring, or None outside the band. Cells with
/// `d > 1` are cut by the height-field builder before this is consulted.
pub fn oval_t(d: f64, band_uv: f64) -> Option<f64> {
    if band_uv <= 0.0 || d > 1.0 {
        return None;
    }
    let t = (1.0 - d) / band_uv;
    if t < 1.0 { Some(t) } else { None }
}
