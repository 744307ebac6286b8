//! Cover-fit image placement.
//!
//! A source bitmap is scaled uniformly so it fills the target box
//! completely, centered, with the overflow cropped by the box itself.

use image::RgbaImage;

use super::canvas::{Rasterizer, Rect};
use crate::error::BannerError;

/// Where to draw an `image_w × image_h` bitmap so it covers a
/// `box_w × box_h` box. Coordinates are relative to the box origin.
///
/// Returns `None` for a zero-sized image.
pub fn cover_fit(image_w: u32, image_h: u32, box_w: f32, box_h: f32) -> Option<Rect> {
    if image_w == 0 || image_h == 0 {
        return None;
    }

    let image_aspect = image_w as f32 / image_h as f32;
    let box_aspect = box_w / box_h;

    let (draw_w, draw_h) = if image_aspect > box_aspect {
        (box_h * image_aspect, box_h)
    } else {
        (box_w, box_w / image_aspect)
    };

    Some(Rect::new(
        (box_w - draw_w) / 2.0,
        (box_h - draw_h) / 2.0,
        draw_w,
        draw_h,
    ))
}

/// Draw `image` cover-fitted into `target`, clipped to it.
///
/// Returns the rectangle the image was scaled to (in canvas coordinates).
pub fn draw_cover(
    canvas: &mut dyn Rasterizer,
    image: &RgbaImage,
    target: Rect,
) -> Result<Rect, BannerError> {
    let fit = cover_fit(image.width(), image.height(), target.width, target.height)
        .ok_or_else(|| {
            BannerError::Composition(format!(
                "Source image has no pixels ({}x{})",
                image.width(),
                image.height()
            ))
        })?;

    let dest = Rect::new(target.x + fit.x, target.y + fit.y, fit.width, fit.height);
    if !target.is_empty() {
        canvas.draw_image(image, dest, target);
    }
    Ok(dest)
}
