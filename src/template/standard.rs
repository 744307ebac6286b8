//! Standard templates (`blue_white`, `red_white`).
//!
//! ```text
//! ┌──────────────────────────────┐
//! │                              │
//! │   source image, cover-fit    │  height − 30
//! │   over a backdrop            │
//! │                              │
//! ├══════════════════════════════┤  2px separator
//! │        UPPERCASE TEXT        │  30px gradient plaque
//! └──────────────────────────────┘
//! ```
//!
//! The backdrop is flat `#f3f4f6` for generated images. Uploaded images get
//! a pastel gradient derived from their dominant color, since they are often
//! cut-outs that do not fill the frame.

use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::color::Rgb;
use crate::color::dominant_color;
use crate::color::palette::generate_gradient_palette;
use crate::error::BannerError;
use crate::render::canvas::{Paint, Rasterizer, Rect, TextStyle};
use crate::render::compositor::draw_cover;
use crate::render::gradient::{Gradient, GradientStyle};
use crate::text::fit::{STANDARD_PLAQUE_HEIGHT, fit_standard};
use crate::text::font::BOLD;
use crate::text::{FontBook, TextAlign, TextBaseline};

use super::StandardTheme;

/// Backdrop behind generated (non-uploaded) images.
pub const NEUTRAL_BACKDROP: Rgb = Rgb::from_hex(0xf3f4f6);

const SEPARATOR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 64]);
const SEPARATOR_HEIGHT: f32 = 2.0;
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fill `area` behind the source image.
///
/// Uploaded images get a harmony gradient seeded from their dominant color;
/// everything else gets the neutral grey.
pub fn paint_backdrop<R: Rng + ?Sized>(
    canvas: &mut dyn Rasterizer,
    image: &RgbaImage,
    area: Rect,
    is_uploaded: bool,
    rng: &mut R,
) {
    if !is_uploaded {
        canvas.fill_rect(area, &Paint::Solid(NEUTRAL_BACKDROP.to_rgba()));
        return;
    }

    let dominant = dominant_color(image);
    let palette = generate_gradient_palette(dominant, rng);
    let style = GradientStyle::random(rng);
    tracing::debug!(
        ?dominant,
        harmony = ?palette.harmony,
        color1 = %palette.color1,
        color2 = %palette.color2,
        ?style,
        "Uploaded image backdrop"
    );

    let gradient = style.build(
        area.width,
        area.height,
        palette.color1.to_rgb().to_rgba(),
        palette.color2.to_rgb().to_rgba(),
    );
    canvas.fill_rect(area, &Paint::Gradient(gradient));
}

/// Compose a standard banner onto `canvas`.
pub fn compose<R: Rng + ?Sized>(
    canvas: &mut dyn Rasterizer,
    image: &RgbaImage,
    headline: &str,
    theme: StandardTheme,
    is_uploaded: bool,
    fonts: &FontBook,
    rng: &mut R,
) -> Result<(), BannerError> {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let image_height = (h - STANDARD_PLAQUE_HEIGHT).max(0.0);
    let image_area = Rect::new(0.0, 0.0, w, image_height);

    // Image region
    if !image_area.is_empty() {
        paint_backdrop(canvas, image, image_area, is_uploaded, rng);
    }
    draw_cover(canvas, image, image_area)?;

    // Plaque
    let (top, bottom) = theme.plaque_colors();
    let plaque = Gradient::linear(
        0.0,
        image_height,
        0.0,
        h,
        Rgb::from_hex(top).to_rgba(),
        Rgb::from_hex(bottom).to_rgba(),
    );
    canvas.fill_rect(
        Rect::new(0.0, image_height, w, h - image_height),
        &Paint::Gradient(plaque),
    );
    canvas.fill_rect(
        Rect::new(0.0, image_height, w, SEPARATOR_HEIGHT),
        &Paint::Solid(SEPARATOR_COLOR),
    );

    // Text
    let text = theme.text_transform().apply(headline);
    let font = fonts.spec(None, 18.0, BOLD);
    let layout = fit_standard(&*canvas, &text, w, &font);
    tracing::debug!(
        lines = layout.lines.len(),
        font_size = layout.font_size_px,
        "Standard headline layout"
    );

    let style = TextStyle::new(font.with_size(layout.font_size_px), TEXT_COLOR)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Middle);
    let lh = layout.line_height_px;
    let n = layout.lines.len() as f32;
    let start_y = image_height + STANDARD_PLAQUE_HEIGHT / 2.0 - (n - 1.0) * lh / 2.0;

    for (i, line) in layout.lines.iter().enumerate() {
        canvas.fill_text(line, w / 2.0, start_y + i as f32 * lh, &style);
    }

    Ok(())
}
