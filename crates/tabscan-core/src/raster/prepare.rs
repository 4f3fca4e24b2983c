//! Page image preparation ahead of text recognition.
//!
//! Wide renders are downscaled to a fixed width and every page is reduced to
//! a single luminance channel, which keeps recognizer cost bounded.

use crate::error::TabscanError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;
use tracing::trace;

/// Widest image handed to the recognizer.
pub const MAX_RECOGNITION_WIDTH: u32 = 1200;

/// Load a rendered page from disk and prepare it for recognition.
pub fn load_for_recognition(path: &Path, max_width: u32) -> Result<GrayImage, TabscanError> {
    let img = image::open(path)?;
    Ok(prepare_for_recognition(&img, max_width))
}

/// Convert to grayscale and shrink to `max_width` if wider, keeping the
/// aspect ratio (height rounds down). Downscaling is bicubic.
pub fn prepare_for_recognition(img: &DynamicImage, max_width: u32) -> GrayImage {
    let gray = to_luma_601(img);
    let (width, height) = gray.dimensions();
    if width <= max_width {
        return gray;
    }

    let new_height = ((u64::from(height) * u64::from(max_width)) / u64::from(width)).max(1) as u32;
    trace!(width, height, max_width, new_height, "downscaling page image");
    imageops::resize(&gray, max_width, new_height, FilterType::CatmullRom)
}

/// Luminance with ITU-R 601-2 weights (0.299, 0.587, 0.114) in 16-bit fixed
/// point, rounded. `DynamicImage::to_luma8` uses Rec. 709 weights instead,
/// which shifts colored text and backgrounds by several levels. Alpha is ignored.
fn to_luma_601(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_wide_image_is_downscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2400, 1000, Rgb([200, 10, 10])));
        let prepared = prepare_for_recognition(&img, MAX_RECOGNITION_WIDTH);
        assert_eq!(prepared.dimensions(), (1200, 500));
    }

    #[test]
    fn test_height_rounds_down() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(1275, 1650));
        let prepared = prepare_for_recognition(&img, MAX_RECOGNITION_WIDTH);
        // 1650 * 1200 / 1275 = 1552.94
        assert_eq!(prepared.dimensions(), (1200, 1552));
    }

    #[test]
    fn test_narrow_image_keeps_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(800, 600));
        let prepared = prepare_for_recognition(&img, MAX_RECOGNITION_WIDTH);
        assert_eq!(prepared.dimensions(), (800, 600));
    }

    #[test]
    fn test_exactly_max_width_keeps_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(1200, 90));
        assert_eq!(
            prepare_for_recognition(&img, MAX_RECOGNITION_WIDTH).dimensions(),
            (1200, 90)
        );
    }

    #[test]
    fn test_output_is_luminance() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
        let prepared = prepare_for_recognition(&img, MAX_RECOGNITION_WIDTH);
        assert_eq!(prepared.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_luma_uses_601_weights() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));
        let prepared = prepare_for_recognition(&DynamicImage::ImageRgb8(img), MAX_RECOGNITION_WIDTH);
        let levels: Vec<u8> = prepared.pixels().map(|p| p.0[0]).collect();
        assert_eq!(levels, vec![76, 150, 29]);
    }

    #[test]
    fn test_gray_input_passes_through() {
        let gray = GrayImage::from_pixel(10, 10, Luma([123]));
        let prepared = prepare_for_recognition(&DynamicImage::ImageLuma8(gray), MAX_RECOGNITION_WIDTH);
        assert!(prepared.pixels().all(|p| p.0 == [123]));
    }

    #[test]
    fn test_uniform_page_survives_downscale() {
        let gray = GrayImage::from_pixel(2400, 200, Luma([200]));
        let prepared = prepare_for_recognition(&DynamicImage::ImageLuma8(gray), MAX_RECOGNITION_WIDTH);
        assert_eq!(prepared.dimensions(), (1200, 100));
        assert!(prepared.pixels().all(|p| p.0[0].abs_diff(200) <= 1));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_1.png");
        GrayImage::new(1600, 400).save(&path).unwrap();

        let prepared = load_for_recognition(&path, MAX_RECOGNITION_WIDTH).unwrap();
        assert_eq!(prepared.dimensions(), (1200, 300));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_for_recognition(&dir.path().join("nope.png"), MAX_RECOGNITION_WIDTH);
        assert!(matches!(err, Err(TabscanError::Image(_))));
    }
}
