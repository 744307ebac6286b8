//! Mean luma over a rectangular region.
//!
//! The branded composer measures the area under the headline before drawing
//! it. The measurement is logged but does not change the treatment: text
//! backgrounds are always drawn.

use image::RgbaImage;

/// Rec. 601 luma of an RGB triple, 0.0–255.0.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Average luma of the pixels in `[x, x+width) × [y, y+height)`, clipped to
/// the image. Returns `None` when the clipped region is empty.
pub fn region_luma(image: &RgbaImage, x: i64, y: i64, width: i64, height: i64) -> Option<f32> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(image.width() as i64);
    let y1 = (y + height).min(image.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut sum = 0.0f64;
    for py in y0..y1 {
        for px in x0..x1 {
            let p = image.get_pixel(px as u32, py as u32);
            sum += luma(p[0], p[1], p[2]) as f64;
        }
    }

    let count = ((x1 - x0) * (y1 - y0)) as f64;
    Some((sum / count) as f32)
}

/// Whether a region reads as a light background (luma above the midpoint).
pub fn is_light(mean_luma: f32) -> bool {
    mean_luma > 127.5
}
