//! Render configuration.
//!
//! A [`ReliefConfig`] is an immutable snapshot of every option recognized by
//! one render pass. Shape and border variants are dispatched once per pass,
//! never compared per cell.

use serde::{Deserialize, Serialize};

use crate::error::{ReliefError, ReliefResult};

/// Decorative border profile applied near the image perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    /// No border.
    #[default]
    None,
    /// Constant-height lip.
    Flat,
    /// Quarter-cosine taper, high at the outer edge.
    Rounded,
    /// Linear ramp toward the image.
    Chamfer,
    /// Decorative lip/groove/bead/taper profile.
    Frame,
    /// Elliptical ring using the rounded profile; cuts the silhouette round.
    Oval,
}

/// Parametric surface the heightfield is projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Flat panel.
    #[default]
    Flat,
    /// Full cylinder; width_mm is the circumference.
    Cylinder,
    /// Partial cylinder over `angle_degrees`; width_mm is the arc length.
    Arc,
    /// Full sphere; width_mm is the equatorial circumference.
    Sphere,
    /// Flat panel with an elliptical silhouette.
    Circle,
}

/// Border options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub kind: BorderKind,
    /// Band width in mm, measured inward from the edge.
    pub width_mm: f64,
    /// Peak border height in mm (absolute, before base_mm).
    pub depth_mm: f64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            kind: BorderKind::None,
            width_mm: 4.0,
            depth_mm: 2.0,
        }
    }
}

/// Shape options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub kind: ShapeKind,
    /// Arc sweep in degrees; only used by `ShapeKind::Arc`.
    pub angle_degrees: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Flat,
            angle_degrees: 90.0,
        }
    }
}

/// Mounting hole options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountingConfig {
    pub enabled: bool,
    pub diameter_mm: f64,
    /// Distance from the top edge to the hole center, in mm.
    pub offset_mm: f64,
}

impl Default for MountingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            diameter_mm: 4.0,
            offset_mm: 5.0,
        }
    }
}

/// Immutable configuration snapshot for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefConfig {
    /// Number of quantized height levels (>= 2).
    pub layer_count: u32,
    /// Thickness of the brightest cell, in mm.
    pub min_height_mm: f64,
    /// Thickness of the darkest cell, in mm.
    pub max_height_mm: f64,
    /// Physical print width in mm.
    pub width_mm: f64,
    /// Physical size of one grid cell in mm.
    pub pixel_size_mm: f64,
    /// Swap dark/light height mapping.
    pub invert: bool,
    /// Smoothing factor in [0, 1]; blur radius = round(smoothing * 3) px.
    pub smoothing: f64,
    /// Contrast factor applied around mid-gray.
    pub contrast: f64,
    /// Brightness multiplier.
    pub brightness: f64,
    /// Gamma; 1.0 disables the transform.
    pub gamma: f64,
    /// Cut cells brighter than `background_threshold` out of the model.
    pub background_removal: bool,
    /// Luminance cutoff for background removal (0-255).
    pub background_threshold: u8,
    /// Per-level keep flags, indexed by final physical height level
    /// (0 = thinnest). Empty means all visible; a wrong length also
    /// degrades to all visible.
    pub layer_visibility: Vec<bool>,
    /// Solid floor thickness in mm.
    pub base_mm: f64,
    pub border: BorderConfig,
    pub shape: ShapeConfig,
    pub mounting: MountingConfig,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            layer_count: 16,
            min_height_mm: 0.6,
            max_height_mm: 3.0,
            width_mm: 100.0,
            pixel_size_mm: 0.25,
            invert: false,
            smoothing: 0.0,
            contrast: 1.0,
            brightness: 1.0,
            gamma: 1.0,
            background_removal: false,
            background_threshold: 245,
            layer_visibility: Vec::new(),
            base_mm: 0.0,
            border: BorderConfig::default(),
            shape: ShapeConfig::default(),
            mounting: MountingConfig::default(),
        }
    }
}

impl ReliefConfig {
    /// Check numeric constraints, returning `InvalidConfiguration` on the
    /// first violation. A mismatched `layer_visibility` length is not an
    /// error (stale UI state degrades to all-visible downstream).
    pub fn validate(&self) -> ReliefResult<()> {
        if self.layer_count < 2 {
            return Err(ReliefError::invalid_configuration(format!(
                "layer_count must be >= 2, got {}",
                self.layer_count
            )));
        }
        if !(self.max_height_mm > self.min_height_mm) {
            return Err(ReliefError::invalid_configuration(format!(
                "max_height_mm ({}) must exceed min_height_mm ({})",
                self.max_height_mm, self.min_height_mm
            )));
        }
        if !(self.min_height_mm >= 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "min_height_mm must be >= 0, got {}",
                self.min_height_mm
            )));
        }
        if !(self.width_mm > 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "width_mm must be > 0, got {}",
                self.width_mm
            )));
        }
        if !(self.pixel_size_mm > 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "pixel_size_mm must be > 0, got {}",
                self.pixel_size_mm
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ReliefError::invalid_configuration(format!(
                "smoothing must be in [0, 1], got {}",
                self.smoothing
            )));
        }
        if !(self.gamma > 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "gamma must be > 0, got {}",
                self.gamma
            )));
        }
        if !(self.brightness >= 0.0) || !(self.contrast >= 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "brightness ({}) and contrast ({}) must be >= 0",
                self.brightness, self.contrast
            )));
        }
        if !(self.base_mm >= 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "base_mm must be >= 0, got {}",
                self.base_mm
            )));
        }
        if self.border.kind != BorderKind::None
            && (!(self.border.width_mm > 0.0) || !(self.border.depth_mm >= 0.0))
        {
            return Err(ReliefError::invalid_configuration(format!(
                "border width_mm ({}) must be > 0 and depth_mm ({}) >= 0",
                self.border.width_mm, self.border.depth_mm
            )));
        }
        if self.shape.kind == ShapeKind::Arc
            && !(self.shape.angle_degrees > 0.0 && self.shape.angle_degrees <= 360.0)
        {
            return Err(ReliefError::invalid_configuration(format!(
                "arc angle_degrees must be in (0, 360], got {}",
                self.shape.angle_degrees
            )));
        }
        if self.mounting.enabled && !(self.mounting.diameter_mm > 0.0) {
            return Err(ReliefError::invalid_configuration(format!(
                "mounting diameter_mm must be > 0, got {}",
                self.mounting.diameter_mm
            )));
        }
        Ok(())
    }

    /// Box blur radius in pixels derived from the smoothing factor.
    pub fn smoothing_radius(&self) -> usize {
        (self.smoothing * 3.0).round() as usize
    }

    /// Grid dimensions for a source image, preserving aspect ratio.
    /// Both dimensions are at least 2 so the grid always forms quads.
    pub fn grid_dims(&self, image_width: u32, image_height: u32) -> (usize, usize) {
        let width = (self.width_mm / self.pixel_size_mm).round().max(2.0) as usize;
        let height = ((width as f64) * (image_height as f64) / (image_width as f64))
            .round()
            .max(2.0) as usize;
        (width, height)
    }

    /// Height-field depth span in mm.
    #[inline]
    pub fn height_span_mm(&self) -> f64 {
        self.max_height_mm - self.min_height_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ReliefConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_single_layer() {
        let cfg = ReliefConfig {
            layer_count: 1,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ReliefError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_height_range() {
        let cfg = ReliefConfig {
            min_height_mm: 3.0,
            max_height_mm: 0.6,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_arc() {
        let cfg = ReliefConfig {
            shape: ShapeConfig {
                kind: ShapeKind::Arc,
                angle_degrees: 0.0,
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_mismatched_visibility_is_not_an_error() {
        let cfg = ReliefConfig {
            layer_count: 4,
            layer_visibility: vec![true, false],
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_smoothing_radius() {
        let mut cfg = ReliefConfig::default();
        assert_eq!(cfg.smoothing_radius(), 0);
        cfg.smoothing = 0.5;
        assert_eq!(cfg.smoothing_radius(), 2);
        cfg.smoothing = 1.0;
        assert_eq!(cfg.smoothing_radius(), 3);
    }

    #[test]
    fn test_grid_dims_preserve_aspect() {
        let cfg = ReliefConfig {
            width_mm: 100.0,
            pixel_size_mm: 0.5,
            ..Default::default()
        };
        let (w, h) = cfg.grid_dims(400, 200);
        assert_eq!(w, 200);
        assert_eq!(h, 100);
    }

    #[test]
    fn test_grid_dims_minimum() {
        let cfg = ReliefConfig {
            width_mm: 1.0,
            pixel_size_mm: 10.0,
            ..Default::default()
        };
        let (w, h) = cfg.grid_dims(100, 1);
        assert!(w >= 2);
        assert!(h >= 2);
    }

    #[test]
    fn test_config_json_round_trip() {
        let cfg = ReliefConfig {
            invert: true,
            border: BorderConfig {
                kind: BorderKind::Frame,
                width_mm: 6.0,
                depth_mm: 2.5,
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ReliefConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: ReliefConfig = serde_json::from_str(r#"{"layer_count": 4}"#).unwrap();
        assert_eq!(cfg.layer_count, 4);
        assert_eq!(cfg.width_mm, 100.0);
        assert_eq!(cfg.shape.kind, ShapeKind::Flat);
    }
}
