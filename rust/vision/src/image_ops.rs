// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing operations for sketch recognition

use crate::error::{Result, VisionError};
use image::{DynamicImage, GrayImage, Luma, RgbImage, RgbaImage};
use imageproc::distance_transform::Norm;

/// Decode PNG/JPEG bytes into an 8-bit RGB grid
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(VisionError::InvalidImage {
            width: rgb.width(),
            height: rgb.height(),
        });
    }
    Ok(rgb)
}

/// Convert RGBA bytes to an RGB image, dropping alpha
///
/// The buffer must hold at least `width * height * 4` bytes; a short buffer
/// or an empty grid is rejected rather than padded.
pub fn rgba_to_rgb(rgba: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    if width == 0 || height == 0 {
        return Err(VisionError::InvalidImage { width, height });
    }
    let image = RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or(VisionError::InvalidImage { width, height })?;
    Ok(DynamicImage::ImageRgba8(image).to_rgb8())
}

/// Luminance conversion (ITU-R BT.601)
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        gray.put_pixel(x, y, Luma([luma.round().min(255.0) as u8]));
    }

    gray
}

/// Apply Gaussian blur for noise reduction
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Adaptive threshold against the local mean
///
/// A pixel becomes white when it is brighter than the mean of its
/// `(2r + 1)^2` neighborhood minus `c`, black otherwise. The neighborhood is
/// clipped at the image border.
pub fn adaptive_threshold(image: &GrayImage, block_radius: u32, c: f64) -> GrayImage {
    let (width, height) = image.dimensions();
    let w = width as usize;
    let h = height as usize;
    let stride = w + 1;

    // Summed-area table with a zero row and column in front
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += image.get_pixel(x as u32, y as u32).0[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let r = block_radius as usize;
    let mut result = GrayImage::new(width, height);

    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r + 1).min(w);

            let sum = (integral[y1 * stride + x1] + integral[y0 * stride + x0])
                - (integral[y0 * stride + x1] + integral[y1 * stride + x0]);
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let mean = sum as f64 / count;

            let pixel = image.get_pixel(x as u32, y as u32).0[0] as f64;
            let value = if pixel > mean - c { 255 } else { 0 };
            result.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    result
}

/// Apply Canny edge detection
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Canny with thresholds derived from the median intensity: `median * (1 -/+ sigma)`
pub fn auto_canny(image: &GrayImage, sigma: f64) -> GrayImage {
    let median = median_intensity(image);
    let lower = ((1.0 - sigma) * median).max(0.0).floor();
    let upper = ((1.0 + sigma) * median).min(255.0).floor();
    canny_edges(image, lower as f32, upper as f32)
}

/// Median pixel value; the mean of the two middle values for even counts
pub fn median_intensity(image: &GrayImage) -> f64 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let nth = |k: u64| -> f64 {
        let mut seen = 0u64;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > k {
                return value as f64;
            }
        }
        255.0
    };

    if total % 2 == 1 {
        nth(total / 2)
    } else {
        (nth(total / 2 - 1) + nth(total / 2)) / 2.0
    }
}

/// Mean pixel value
pub fn mean_intensity(image: &GrayImage) -> f64 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / count as f64
}

/// Morphological dilation with a square kernel of side `2 * radius + 1`
pub fn dilate(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::dilate(image, Norm::LInf, radius)
}

/// Morphological erosion with a square kernel of side `2 * radius + 1`
pub fn erode(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::erode(image, Norm::LInf, radius)
}

/// Morphological closing (dilate then erode) - fills small gaps
pub fn morphological_close(image: &GrayImage, radius: u8) -> GrayImage {
    let dilated = dilate(image, radius);
    erode(&dilated, radius)
}

/// Invert a binary image
pub fn invert(image: &GrayImage) -> GrayImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        pixel.0[0] = 255 - pixel.0[0];
    }
    result
}

/// Global threshold - pixels strictly above `level` become white
pub fn threshold(image: &GrayImage, level: u8) -> GrayImage {
    let mut result = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if pixel.0[0] > level { 255 } else { 0 };
        result.put_pixel(x, y, Luma([value]));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_threshold_is_strict() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([200]));
        img.put_pixel(2, 0, Luma([201]));

        let result = threshold(&img, 200);

        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert_eq!(result.get_pixel(1, 0).0[0], 0);
        assert_eq!(result.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn test_invert() {
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 1, Luma([255]));

        let inverted = invert(&img);

        assert_eq!(inverted.get_pixel(0, 0).0[0], 255);
        assert_eq!(inverted.get_pixel(1, 1).0[0], 0);
    }

    #[test]
    fn test_to_grayscale() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        rgb.put_pixel(1, 0, Rgb([0, 0, 0]));
        rgb.put_pixel(2, 0, Rgb([255, 0, 0]));

        let gray = to_grayscale(&rgb);

        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
        assert_eq!(gray.get_pixel(2, 0).0[0], 76);
    }

    #[test]
    fn test_rgba_to_rgb() {
        let rgba = vec![255, 255, 255, 255, 10, 20, 30, 0];
        let rgb = rgba_to_rgb(&rgba, 2, 1).unwrap();

        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_rgba_short_buffer_is_rejected() {
        // 100 pixels of data for a 100x100 grid
        let rgba = vec![255u8; 400];

        let err = rgba_to_rgb(&rgba, 100, 100).unwrap_err();

        assert_eq!(err.kind(), "invalid_image");
        assert!(rgba_to_rgb(&[], 0, 4).is_err());
        assert!(rgba_to_rgb(&rgba, u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_median_intensity() {
        let mut img = GrayImage::new(4, 1);
        for (x, v) in [10u8, 20, 30, 40].iter().enumerate() {
            img.put_pixel(x as u32, 0, Luma([*v]));
        }
        assert_eq!(median_intensity(&img), 25.0);

        let img = GrayImage::from_pixel(3, 3, Luma([77]));
        assert_eq!(median_intensity(&img), 77.0);
    }

    #[test]
    fn test_adaptive_threshold_uniform_is_white() {
        let img = GrayImage::from_pixel(20, 20, Luma([180]));
        let binary = adaptive_threshold(&img, 5, 2.0);
        assert!(binary.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_adaptive_threshold_dark_stroke_is_black() {
        let mut img = GrayImage::from_pixel(30, 30, Luma([255]));
        for y in 0..30 {
            img.put_pixel(15, y, Luma([0]));
        }

        let binary = adaptive_threshold(&img, 5, 2.0);

        assert_eq!(binary.get_pixel(15, 10).0[0], 0);
        assert_eq!(binary.get_pixel(5, 10).0[0], 255);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), "could_not_read_image");
    }
}
