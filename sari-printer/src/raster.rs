//! Logo rasterization for GS v 0 raster graphics
//!
//! Converts a bitmap logo into the packed monochrome form thermal
//! printers consume: fixed luma/alpha thresholds, 8 pixels per byte,
//! MSB first, row-major.

use tracing::{info, warn};

/// Narrowest sensible logo, in dots
pub const MIN_LOGO_WIDTH: u32 = 64;

/// Maximum dot width of an 80mm print head
pub const MAX_LOGO_WIDTH: u32 = 576;

// Pixels more transparent than this never print
const ALPHA_CUTOFF: u8 = 32;

// Pixels darker than this (Rec. 709 luma) print as ink
const LUMA_CUTOFF: f32 = 160.0;

/// Packed monochrome bitmap
///
/// `width` is always a multiple of 8; `data` holds `width / 8 * height`
/// bytes, row-major, MSB = leftmost pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Serialize as a GS v 0 raster graphics block
    ///
    /// Layout: `1D 76 30 00` + width-in-bytes (LE u16) + height (LE u16)
    /// + packed bitmap.
    pub fn to_command(&self) -> Vec<u8> {
        let x_bytes = self.width / 8;
        let mut out = Vec::with_capacity(8 + self.data.len());
        out.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        out.push(x_bytes as u8);
        out.push((x_bytes >> 8) as u8);
        out.push(self.height as u8);
        out.push((self.height >> 8) as u8);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Clamp a requested dot width to the printable range and round down
/// to a whole number of bytes.
fn clamp_width(target_width: u32) -> u32 {
    target_width.clamp(MIN_LOGO_WIDTH, MAX_LOGO_WIDTH) / 8 * 8
}

/// Rasterize a logo file into a ready-to-send GS v 0 block
///
/// A missing or unreadable file yields an empty buffer so the logo is
/// silently omitted from the receipt; printing never fails on a logo.
pub fn rasterize(path: &str, target_width: u32) -> Vec<u8> {
    match load(path, target_width) {
        Some(raster) => raster.to_command(),
        None => Vec::new(),
    }
}

/// Load and threshold a logo file
pub fn load(path: &str, target_width: u32) -> Option<RasterImage> {
    let img = match image::open(path) {
        Ok(i) => i,
        Err(e) => {
            warn!(path = path, error = %e, "logo not loaded, omitting");
            return None;
        }
    };

    let raster = from_image(&img, target_width);
    info!(
        path = path,
        width = raster.width,
        height = raster.height,
        "logo rasterized"
    );
    Some(raster)
}

/// Threshold and pack an already-loaded image
pub fn from_image(img: &image::DynamicImage, target_width: u32) -> RasterImage {
    use image::GenericImageView;

    let (src_w, src_h) = img.dimensions();
    let width = clamp_width(target_width);
    let ratio = width as f64 / src_w.max(1) as f64;
    let height = ((src_h as f64 * ratio).round() as u32).max(1);

    let resized = img.resize_exact(width, height, image::imageops::FilterType::Nearest);
    let rgba = resized.to_rgba8();

    let x_bytes = width / 8;
    let mut data = Vec::with_capacity((x_bytes * height) as usize);

    for y in 0..height {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let pixel = rgba.get_pixel(x_byte * 8 + bit, y);
                if is_ink(pixel) {
                    byte |= 1 << (7 - bit);
                }
            }
            data.push(byte);
        }
    }

    RasterImage {
        width,
        height,
        data,
    }
}

fn is_ink(pixel: &image::Rgba<u8>) -> bool {
    if pixel[3] <= ALPHA_CUTOFF {
        return false;
    }
    let luma =
        0.2126 * pixel[0] as f32 + 0.7152 * pixel[1] as f32 + 0.0722 * pixel[2] as f32;
    luma < LUMA_CUTOFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn checkerboard(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbaImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            };
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_width_clamped_and_byte_aligned() {
        assert_eq!(clamp_width(100), 96);
        assert_eq!(clamp_width(10), 64);
        assert_eq!(clamp_width(10_000), 576);
        assert_eq!(clamp_width(384), 384);
    }

    #[test]
    fn test_command_length() {
        let img = checkerboard(64, 16);
        let raster = from_image(&img, 64);
        let cmd = raster.to_command();
        assert_eq!(raster.width % 8, 0);
        assert_eq!(
            cmd.len(),
            8 + (raster.width as usize / 8) * raster.height as usize
        );
        assert_eq!(&cmd[..4], &[0x1D, 0x76, 0x30, 0x00]);
    }

    #[test]
    fn test_command_dimensions_little_endian() {
        let img = checkerboard(576, 4);
        let raster = from_image(&img, 576);
        let cmd = raster.to_command();
        // 576 / 8 = 72 bytes per row
        assert_eq!(cmd[4], 72);
        assert_eq!(cmd[5], 0);
        assert_eq!(cmd[6], raster.height as u8);
        assert_eq!(cmd[7], 0);
    }

    #[test]
    fn test_dark_pixels_are_ink() {
        assert!(is_ink(&Rgba([0, 0, 0, 255])));
        assert!(!is_ink(&Rgba([255, 255, 255, 255])));
        // Transparent black never prints
        assert!(!is_ink(&Rgba([0, 0, 0, 0])));
        assert!(!is_ink(&Rgba([0, 0, 0, 32])));
    }

    #[test]
    fn test_msb_first_packing() {
        let mut img = RgbaImage::new(8, 1);
        // Only leftmost pixel dark
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        for x in 1..8 {
            img.put_pixel(x, 0, Rgba([255, 255, 255, 255]));
        }
        // Width 8 is under the minimum so the image is upscaled to 64;
        // each source pixel becomes 8 dots.
        let raster = from_image(&DynamicImage::ImageRgba8(img), 64);
        assert_eq!(raster.width, 64);
        assert_eq!(raster.data[0], 0xFF);
        assert_eq!(raster.data[1], 0x00);
    }

    #[test]
    fn test_missing_file_is_silent() {
        let bytes = rasterize("/nonexistent/logo.png", 384);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_rasterize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        checkerboard(100, 40).save(&path).unwrap();

        let a = rasterize(path.to_str().unwrap(), 384);
        let b = rasterize(path.to_str().unwrap(), 384);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
