//! Crop geometry from source transforms
//!
//! An image paint's 2x3 transform describes the visible window of the source
//! bitmap in normalized coordinates: the translate components are the crop
//! origin, the scale components the crop extent. Invalid windows never fail
//! the item; the caller keeps the original asset instead.

use image::DynamicImage;
use log::warn;

use crate::types::Transform;

/// Pixel-space crop window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tolerance for windows extending marginally past the bitmap edge due to
/// float rounding in the source transform
const EDGE_TOLERANCE: f64 = 0.5;

/// Compute the pixel crop window for a bitmap of the given size
///
/// Returns `None` (caller keeps the original) when the window is degenerate
/// (zero or negative extent) or reaches out of bounds.
pub fn compute_crop_rect(transform: &Transform, width: u32, height: u32) -> Option<CropRect> {
    let origin_x = transform[0][2] * f64::from(width);
    let origin_y = transform[1][2] * f64::from(height);
    let extent_w = transform[0][0] * f64::from(width);
    let extent_h = transform[1][1] * f64::from(height);

    if extent_w <= 0.0 || extent_h <= 0.0 {
        warn!("degenerate crop window ({extent_w:.1}x{extent_h:.1}), keeping original");
        return None;
    }
    if origin_x < -EDGE_TOLERANCE
        || origin_y < -EDGE_TOLERANCE
        || origin_x + extent_w > f64::from(width) + EDGE_TOLERANCE
        || origin_y + extent_h > f64::from(height) + EDGE_TOLERANCE
    {
        warn!(
            "crop window out of bounds (origin {origin_x:.1},{origin_y:.1} extent {extent_w:.1}x{extent_h:.1} in {width}x{height}), keeping original"
        );
        return None;
    }

    let x = origin_x.max(0.0).round() as u32;
    let y = origin_y.max(0.0).round() as u32;
    if x >= width || y >= height {
        warn!("crop origin ({x},{y}) outside {width}x{height} bitmap, keeping original");
        return None;
    }
    let rect_w = (extent_w.round().max(1.0) as u32).min(width - x);
    let rect_h = (extent_h.round().max(1.0) as u32).min(height - y);

    Some(CropRect {
        x,
        y,
        width: rect_w,
        height: rect_h,
    })
}

/// Apply a crop window to a decoded image
pub fn apply_crop(image: &DynamicImage, rect: CropRect) -> DynamicImage {
    image.crop_imm(rect.x, rect.y, rect.width, rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_crop() {
        let transform: Transform = [[0.5, 0.0, 0.25], [0.0, 0.5, 0.25]];
        let rect = compute_crop_rect(&transform, 100, 100).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 25,
                y: 25,
                width: 50,
                height: 50
            }
        );
    }

    #[test]
    fn test_zero_extent_is_rejected() {
        let transform: Transform = [[0.0, 0.0, 0.25], [0.0, 0.5, 0.25]];
        assert!(compute_crop_rect(&transform, 100, 100).is_none());
    }

    #[test]
    fn test_negative_extent_is_rejected() {
        let transform: Transform = [[-0.5, 0.0, 0.5], [0.0, 0.5, 0.25]];
        assert!(compute_crop_rect(&transform, 100, 100).is_none());
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let transform: Transform = [[0.8, 0.0, 0.5], [0.0, 0.5, 0.25]];
        assert!(compute_crop_rect(&transform, 100, 100).is_none());
    }

    #[test]
    fn test_marginal_overflow_tolerated() {
        // 0.999 + 0.0015 sticks out by a fraction of a pixel
        let transform: Transform = [[0.999, 0.0, 0.0015], [0.0, 1.0, 0.0]];
        let rect = compute_crop_rect(&transform, 1000, 100).unwrap();
        assert!(rect.x + rect.width <= 1000);
    }

    #[test]
    fn test_apply_crop_dimensions() {
        let image = DynamicImage::new_rgba8(100, 50);
        let rect = CropRect {
            x: 10,
            y: 5,
            width: 30,
            height: 20,
        };
        let cropped = apply_crop(&image, rect);
        assert_eq!(cropped.width(), 30);
        assert_eq!(cropped.height(), 20);
    }
}
