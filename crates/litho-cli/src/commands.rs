//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use litho_relief::{
    BorderKind, MountingConfig, PixelBuffer, ReliefConfig, ReliefError, ShapeKind,
};

use crate::ConfigArgs;

/// Decode an image file into an RGBA pixel buffer.
fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .map_err(|e| ReliefError::image_decode(format!("{}: {}", path.display(), e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::from_rgba(width, height, rgba.into_raw())?)
}

impl ConfigArgs {
    /// Build the effective configuration: JSON file first (if any), then
    /// explicit flag overrides.
    pub fn resolve(&self) -> Result<ReliefConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ReliefConfig::default(),
        };

        if let Some(v) = self.layers {
            cfg.layer_count = v;
        }
        if let Some(v) = self.min_height {
            cfg.min_height_mm = v;
        }
        if let Some(v) = self.max_height {
            cfg.max_height_mm = v;
        }
        if let Some(v) = self.width {
            cfg.width_mm = v;
        }
        if let Some(v) = self.pixel_size {
            cfg.pixel_size_mm = v;
        }
        if self.invert {
            cfg.invert = true;
        }
        if let Some(v) = self.smoothing {
            cfg.smoothing = v;
        }
        if let Some(v) = self.contrast {
            cfg.contrast = v;
        }
        if let Some(v) = self.brightness {
            cfg.brightness = v;
        }
        if let Some(v) = self.gamma {
            cfg.gamma = v;
        }
        if self.remove_background {
            cfg.background_removal = true;
        }
        if let Some(v) = self.background_threshold {
            cfg.background_threshold = v;
        }
        if let Some(v) = self.base {
            cfg.base_mm = v;
        }
        if let Some(v) = self.border {
            cfg.border.kind = BorderKind::from(v);
        }
        if let Some(v) = self.border_width {
            cfg.border.width_mm = v;
        }
        if let Some(v) = self.border_depth {
            cfg.border.depth_mm = v;
        }
        if let Some(v) = self.shape {
            cfg.shape.kind = ShapeKind::from(v);
        }
        if let Some(v) = self.angle {
            cfg.shape.angle_degrees = v;
        }
        if self.mounting_hole {
            cfg.mounting = MountingConfig {
                enabled: true,
                ..cfg.mounting
            };
        }
        if let Some(v) = self.mounting_diameter {
            cfg.mounting.diameter_mm = v;
        }
        if let Some(v) = self.mounting_offset {
            cfg.mounting.offset_mm = v;
        }
        if let Some(list) = &self.hide_layers {
            cfg.layer_visibility = parse_hidden_layers(list, cfg.layer_count)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

/// Turn "0,3,7" into a visibility vector with those levels hidden.
fn parse_hidden_layers(list: &str, layer_count: u32) -> Result<Vec<bool>> {
    let mut visibility = vec![true; layer_count as usize];
    for part in list.split(',').filter(|s| !s.trim().is_empty()) {
        let level: usize = part
            .trim()
            .parse()
            .with_context(|| format!("invalid layer index '{}'", part.trim()))?;
        if level >= visibility.len() {
            anyhow::bail!(
                "layer index {} out of range (layer count is {})",
                level,
                layer_count
            );
        }
        visibility[level] = false;
    }
    Ok(visibility)
}

/// Model name embedded in the STL header, taken from the output file stem.
fn model_name(output: &Path) -> String {
    output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("lithophane")
        .to_string()
}

fn write_preview_png(preview: &litho_relief::Preview, path: &Path) -> Result<()> {
    let img = image::GrayAlphaImage::from_raw(
        preview.width as u32,
        preview.height as u32,
        preview.data.clone(),
    )
    .context("preview buffer size mismatch")?;
    img.save(path)
        .with_context(|| format!("writing preview {}", path.display()))?;
    Ok(())
}

pub fn generate(
    input: &Path,
    output: &Path,
    preview_path: Option<&Path>,
    options: &ConfigArgs,
    quiet: bool,
) -> Result<()> {
    let cfg = options.resolve()?;
    let image = load_image(input)?;

    info!(input = %input.display(), "generating lithophane");
    let result = litho_relief::generate(&image, &cfg)?;
    result.mesh.save_stl(output, &model_name(output))?;

    if let Some(path) = preview_path {
        let preview = litho_relief::preview(&image, &cfg)?;
        write_preview_png(&preview, path)?;
    }

    if !quiet {
        let (min, max) = result.mesh.bounds().expect("non-empty mesh");
        println!(
            "{} {} ({} triangles, {:.1} x {:.1} x {:.1} mm)",
            "Wrote".green().bold(),
            output.display(),
            result.mesh.face_count(),
            max.x - min.x,
            max.y - min.y,
            max.z - min.z,
        );
    }

    Ok(())
}

pub fn preview(input: &Path, output: &Path, options: &ConfigArgs, quiet: bool) -> Result<()> {
    let cfg = options.resolve()?;
    let image = load_image(input)?;

    let preview = litho_relief::preview(&image, &cfg)?;
    write_preview_png(&preview, output)?;

    if !quiet {
        println!(
            "{} {} ({} x {})",
            "Wrote".green().bold(),
            output.display(),
            preview.width,
            preview.height
        );
    }

    Ok(())
}

pub fn info(input: &Path, options: &ConfigArgs) -> Result<()> {
    let cfg = options.resolve()?;
    let image = load_image(input)?;

    let result = litho_relief::generate(&image, &cfg)?;
    let report = result.mesh.validate();

    println!(
        "Grid: {} x {} cells ({} filled)",
        result.grid_width, result.grid_height, result.filled_cells
    );
    println!("Silhouette edges: {}", result.boundary_edges);
    print!("{}", report);

    Ok(())
}
