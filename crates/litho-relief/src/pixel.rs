//! Pixel buffer transforms.
//!
//! All raster work the height-field builder needs: bilinear resampling to
//! grid resolution, the brightness/contrast/gamma adjustment, box blur, and
//! luminance extraction. Each transform is pure and returns a new buffer.

use crate::error::{ReliefError, ReliefResult};

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 data. The length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> ReliefResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 {
            return Err(ReliefError::image_decode("image has zero dimensions"));
        }
        if data.len() != expected {
            return Err(ReliefError::image_decode(format!(
                "RGBA buffer length {} does not match {}x{} ({} bytes expected)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Rec. 601 luma of the pixel at (x, y).
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        let [r, g, b, _] = self.pixel(x, y);
        0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
    }

    /// Resample to the target resolution with bilinear interpolation.
    pub fn resample(&self, width: u32, height: u32) -> PixelBuffer {
        if width == self.width && height == self.height {
            return self.clone();
        }

        let mut out = PixelBuffer {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        };

        let sx = if width > 1 {
            (self.width - 1) as f64 / (width - 1) as f64
        } else {
            0.0
        };
        let sy = if height > 1 {
            (self.height - 1) as f64 / (height - 1) as f64
        } else {
            0.0
        };

        for y in 0..height {
            let fy = y as f64 * sy;
            let y0 = fy.floor() as u32;
            let y1 = (y0 + 1).min(self.height - 1);
            let ty = fy - y0 as f64;

            for x in 0..width {
                let fx = x as f64 * sx;
                let x0 = fx.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let tx = fx - x0 as f64;

                let p00 = self.pixel(x0, y0);
                let p10 = self.pixel(x1, y0);
                let p01 = self.pixel(x0, y1);
                let p11 = self.pixel(x1, y1);

                let mut rgba = [0u8; 4];
                for c in 0..4 {
                    let top = p00[c] as f64 * (1.0 - tx) + p10[c] as f64 * tx;
                    let bottom = p01[c] as f64 * (1.0 - tx) + p11[c] as f64 * tx;
                    rgba[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
                }
                out.set_pixel(x, y, rgba);
            }
        }

        out
    }

    /// Apply the per-pixel linear adjustment: normalize to [0, 1], multiply
    /// by brightness, contrast around mid-gray, then gamma (skipped at 1.0),
    /// clamp and requantize to 8 bits. Alpha is untouched.
    pub fn adjust(&self, brightness: f64, contrast: f64, gamma: f64) -> PixelBuffer {
        let apply_gamma = (gamma - 1.0).abs() > f64::EPSILON;
        let inv_gamma = 1.0 / gamma;

        let mut out = self.clone();
        for chunk in out.data.chunks_exact_mut(4) {
            for c in &mut chunk[..3] {
                let mut v = *c as f64 / 255.0;
                v *= brightness;
                v = (v - 0.5) * contrast + 0.5;
                if apply_gamma {
                    v = v.clamp(0.0, 1.0).powf(inv_gamma);
                }
                *c = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
        out
    }

    /// Box blur with the given radius. Each output channel is the mean of
    /// all in-range samples in the square window; out-of-range samples are
    /// skipped, so edge pixels average fewer samples.
    pub fn box_blur(&self, radius: usize) -> PixelBuffer {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as i64;
        let w = self.width as i64;
        let h = self.height as i64;

        let mut out = self.clone();
        for y in 0..h {
            for x in 0..w {
                let mut sums = [0u64; 4];
                let mut count = 0u64;
                for dy in -r..=r {
                    let sy = y + dy;
                    if sy < 0 || sy >= h {
                        continue;
                    }
                    for dx in -r..=r {
                        let sx = x + dx;
                        if sx < 0 || sx >= w {
                            continue;
                        }
                        let p = self.pixel(sx as u32, sy as u32);
                        for c in 0..4 {
                            sums[c] += p[c] as u64;
                        }
                        count += 1;
                    }
                }
                let mut rgba = [0u8; 4];
                for c in 0..4 {
                    rgba[c] = ((sums[c] as f64 / count as f64).round()) as u8;
                }
                out.set_pixel(x as u32, y as u32, rgba);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(v: u8) -> [u8; 4] {
        [v, v, v, 255]
    }

    #[test]
    fn test_from_rgba_length_check() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::from_rgba(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_luminance_weights() {
        let buf = PixelBuffer::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();
        assert!((buf.luminance(0, 0) - 0.299 * 255.0).abs() < 1e-9);

        let buf = PixelBuffer::filled(1, 1, gray(100));
        assert!((buf.luminance(0, 0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_resample_identity() {
        let buf = PixelBuffer::filled(3, 3, gray(42));
        assert_eq!(buf.resample(3, 3), buf);
    }

    #[test]
    fn test_resample_constant_image_stays_constant() {
        let buf = PixelBuffer::filled(10, 6, gray(99));
        let small = buf.resample(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(small.pixel(x, y), gray(99));
            }
        }
    }

    #[test]
    fn test_resample_interpolates_midpoint() {
        // Two-pixel gradient upsampled to three: midpoint lands between.
        let buf = PixelBuffer::from_rgba(2, 1, vec![0, 0, 0, 255, 200, 200, 200, 255]).unwrap();
        let up = buf.resample(3, 1);
        assert_eq!(up.pixel(0, 0)[0], 0);
        assert_eq!(up.pixel(1, 0)[0], 100);
        assert_eq!(up.pixel(2, 0)[0], 200);
    }

    #[test]
    fn test_adjust_identity() {
        let buf = PixelBuffer::filled(2, 2, gray(77));
        assert_eq!(buf.adjust(1.0, 1.0, 1.0), buf);
    }

    #[test]
    fn test_adjust_brightness_scales() {
        let buf = PixelBuffer::filled(1, 1, gray(100));
        let out = buf.adjust(2.0, 1.0, 1.0);
        assert_eq!(out.pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_adjust_contrast_pivots_on_midgray() {
        let buf = PixelBuffer::filled(1, 1, [128, 0, 255, 255]);
        let out = buf.adjust(1.0, 2.0, 1.0);
        let [r, g, b, a] = out.pixel(0, 0);
        // ~mid-gray barely moves, extremes clamp
        assert!((r as i32 - 129).abs() <= 1);
        assert_eq!(g, 0);
        assert_eq!(b, 255);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_adjust_gamma_brightens_midtones() {
        let buf = PixelBuffer::filled(1, 1, gray(64));
        let out = buf.adjust(1.0, 1.0, 2.0);
        // v^(1/2) with v = 64/255 ~ 0.501 -> ~128
        assert!((out.pixel(0, 0)[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_blur_zero_radius_is_identity() {
        let buf = PixelBuffer::filled(4, 4, gray(10));
        assert_eq!(buf.box_blur(0), buf);
    }

    #[test]
    fn test_blur_averages_window() {
        // 3x1 black-white-black, radius 1: center = (0 + 255 + 0)/3 = 85.
        let buf =
            PixelBuffer::from_rgba(3, 1, vec![0, 0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255])
                .unwrap();
        let blurred = buf.box_blur(1);
        assert_eq!(blurred.pixel(1, 0)[0], 85);
        // Edge pixel averages only its two in-range neighbors.
        assert_eq!(blurred.pixel(0, 0)[0], 128);
    }
}
