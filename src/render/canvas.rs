//! # Raster Canvas
//!
//! The drawing surface templates paint onto.
//!
//! Templates are written against the [`Rasterizer`] trait, which covers the
//! primitives they need: filled (rounded) rectangles with a solid or
//! gradient paint, scaled bitmap blits with a clip rectangle, single-line
//! text with canvas-style alignment, and PNG export. [`SoftwareCanvas`] is
//! the in-memory implementation over an [`RgbaImage`].
//!
//! ## Compositing
//!
//! Every primitive blends with source-over. Rectangle edges that fall on
//! fractional coordinates get partial coverage, so a 0.5 px overhang is
//! drawn at half opacity rather than snapped.

use image::{Rgba, RgbaImage};
use image::imageops::{self, FilterType};

use super::gradient::Gradient;
use crate::error::BannerError;
use crate::text::font::{self, FontSpec};
use crate::text::{MeasureText, TextAlign, TextBaseline};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap of two rectangles, `None` when they do not intersect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Fill style for shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba<u8>),
    Gradient(Gradient),
}

impl Paint {
    #[inline]
    fn color_at(&self, x: f32, y: f32) -> Option<Rgba<u8>> {
        match self {
            Paint::Solid(color) => Some(*color),
            Paint::Gradient(gradient) => gradient.color_at(x, y),
        }
    }
}

impl From<Rgba<u8>> for Paint {
    fn from(color: Rgba<u8>) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

/// Font, color and anchoring for a text draw.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Rgba<u8>,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(font: FontSpec, color: Rgba<u8>) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_font(&self, font: FontSpec) -> Self {
        Self {
            font,
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: Rgba<u8>) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// Drawing primitives used by the templates.
pub trait Rasterizer: MeasureText {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Fill a rectangle with circular corners of `radius` pixels.
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint);

    /// Scale `image` into `dest`, drawing only the part inside `clip`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, clip: Rect);

    /// Draw one line of text anchored at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Current pixels.
    fn pixels(&self) -> &RgbaImage;

    /// Encode the current pixels as PNG.
    fn encode_png(&self) -> Result<Vec<u8>, BannerError> {
        encode_png(self.pixels())
    }
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BannerError> {
    use image::ImageEncoder;

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e: image::ImageError| BannerError::Encode(e.to_string()))?;
    Ok(png_bytes)
}

/// Source pixels `(start, len)` along one axis that map onto the canvas
/// pixels `lo..hi`, for a destination starting at `origin` with `scale`
/// source pixels per canvas pixel. Never empty.
fn source_span(lo: i64, hi: i64, origin: f32, scale: f32, limit: u32) -> (u32, u32) {
    let first = ((lo as f32 - origin) * scale).floor().max(0.0) as u32;
    let first = first.min(limit - 1);
    let end = ((hi as f32 - origin) * scale).ceil().max(0.0) as u32;
    let end = end.clamp(first + 1, limit);
    (first, end - first)
}

/// Source-over blend of `src` onto `dst` at fractional `coverage`.
#[inline]
pub fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = src;
        return;
    }

    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Length of the overlap of `[p, p+1)` with `[lo, hi)`.
#[inline]
fn span_coverage(p: i64, lo: f32, hi: f32) -> f32 {
    let a = (p as f32).max(lo);
    let b = (p as f32 + 1.0).min(hi);
    (b - a).clamp(0.0, 1.0)
}

/// In-memory RGBA canvas. Starts fully transparent.
#[derive(Debug, Clone)]
pub struct SoftwareCanvas {
    pixels: RgbaImage,
}

impl SoftwareCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Integer pixel range covered by `[lo, hi)` clipped to `[0, limit)`.
    fn pixel_range(lo: f32, hi: f32, limit: u32) -> std::ops::Range<i64> {
        let start = (lo.floor() as i64).max(0);
        let end = (hi.ceil() as i64).min(limit as i64);
        start..end.max(start)
    }

    /// Walk the pixels touched by `rect`, blending `paint` with the coverage
    /// returned by `shape` (1.0 = inside).
    fn fill_shape<F>(&mut self, rect: Rect, paint: &Paint, shape: F)
    where
        F: Fn(f32, f32) -> f32,
    {
        if rect.is_empty() {
            return;
        }
        let (w, h) = (self.pixels.width(), self.pixels.height());
        for py in Self::pixel_range(rect.y, rect.bottom(), h) {
            let cov_y = span_coverage(py, rect.y, rect.bottom());
            for px in Self::pixel_range(rect.x, rect.right(), w) {
                let cov_x = span_coverage(px, rect.x, rect.right());
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                let coverage = cov_x * cov_y * shape(cx, cy);
                if coverage <= 0.0 {
                    continue;
                }
                if let Some(color) = paint.color_at(cx, cy) {
                    blend_pixel(self.pixels.get_pixel_mut(px as u32, py as u32), color, coverage);
                }
            }
        }
    }
}

impl MeasureText for SoftwareCanvas {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        font::measure(font, text)
    }
}

impl Rasterizer for SoftwareCanvas {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_shape(rect, paint, |_, _| 1.0);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        if r <= 0.0 {
            self.fill_rect(rect, paint);
            return;
        }
        let (left, right) = (rect.x + r, rect.right() - r);
        let (top, bottom) = (rect.y + r, rect.bottom() - r);
        self.fill_shape(rect, paint, |x, y| {
            // Distance from the nearest corner arc center; zero on the straight parts
            let dx = x - x.clamp(left, right);
            let dy = y - y.clamp(top, bottom);
            let d = (dx * dx + dy * dy).sqrt();
            (r - d + 0.5).clamp(0.0, 1.0)
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, clip: Rect) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || dest.is_empty() {
            return;
        }
        let Some(visible) = dest.intersect(&clip) else {
            return;
        };
        let (w, h) = (self.pixels.width(), self.pixels.height());
        let xs = Self::pixel_range(visible.x, visible.right(), w);
        let ys = Self::pixel_range(visible.y, visible.bottom(), h);
        if xs.is_empty() || ys.is_empty() {
            return;
        }

        // Resample only the source pixels under the visible area; a cover-fit
        // destination can be far larger than the canvas.
        let scale_x = iw as f32 / dest.width;
        let scale_y = ih as f32 / dest.height;
        let (src_x, src_w) = source_span(xs.start, xs.end, dest.x, scale_x, iw);
        let (src_y, src_h) = source_span(ys.start, ys.end, dest.y, scale_y, ih);
        let crop = imageops::crop_imm(image, src_x, src_y, src_w, src_h).to_image();

        let crop_x = dest.x + src_x as f32 / scale_x;
        let crop_y = dest.y + src_y as f32 / scale_y;
        let scaled_w = (src_w as f32 / scale_x).round().max(1.0) as u32;
        let scaled_h = (src_h as f32 / scale_y).round().max(1.0) as u32;
        let scaled = if (scaled_w, scaled_h) == crop.dimensions() {
            crop
        } else {
            imageops::resize(&crop, scaled_w, scaled_h, FilterType::Triangle)
        };

        let ox = crop_x.round() as i64;
        let oy = crop_y.round() as i64;

        for py in ys {
            let sy = py - oy;
            if sy < 0 || sy >= scaled_h as i64 {
                continue;
            }
            for px in xs.clone() {
                let sx = px - ox;
                if sx < 0 || sx >= scaled_w as i64 {
                    continue;
                }
                let src = *scaled.get_pixel(sx as u32, sy as u32);
                blend_pixel(self.pixels.get_pixel_mut(px as u32, py as u32), src, 1.0);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        if text.is_empty() || style.color[3] == 0 {
            return;
        }

        let advance = font::measure(&style.font, text);
        let start_x = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - advance / 2.0,
            TextAlign::Right => x - advance,
        };
        let (ascent, descent) = style.font.vertical_metrics();
        let baseline_y = match style.baseline {
            TextBaseline::Alphabetic => y,
            TextBaseline::Middle => y + (ascent - descent) / 2.0,
            TextBaseline::Top => y + ascent,
        };

        let mask = font::rasterize(&style.font, text);
        let ox = (start_x - mask.pad as f32).round() as i64;
        let oy = (baseline_y - mask.ascent).round() as i64;
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);

        for my in 0..mask.height {
            let py = oy + my as i64;
            if py < 0 || py >= h {
                continue;
            }
            let row = my * mask.width;
            for mx in 0..mask.width {
                let px = ox + mx as i64;
                if px < 0 || px >= w {
                    continue;
                }
                let coverage = mask.data[row + mx];
                if coverage > 0.0 {
                    blend_pixel(
                        self.pixels.get_pixel_mut(px as u32, py as u32),
                        style.color,
                        coverage,
                    );
                }
            }
        }
    }

    fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
