//! # Text
//!
//! Fonts, text measurement and headline layout.
//!
//! - [`font`]: the [`FontBook`](font::FontBook) registry, glyph masks and metrics
//! - [`fit`]: font-size search and word wrapping for each template family
//!
//! Layout only needs widths, so it is written against the [`MeasureText`]
//! trait. The canvas implements it with real glyph metrics; tests can plug
//! in a fixed-advance measurer.

pub mod fit;
pub mod font;

pub use fit::LayoutResult;
pub use font::{FontBook, FontSpec, Typeface};

/// Anything that can report the advance width of a string in a given font.
pub trait MeasureText {
    /// Rendered width of `text` in pixels.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;
}

/// Measures with the glyph metrics of the font itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphMeasure;

impl MeasureText for GlyphMeasure {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        font::measure(font, text)
    }
}

/// Horizontal anchor of the `x` passed to a text draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of the `y` passed to a text draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// `y` is the alphabetic baseline.
    #[default]
    Alphabetic,
    /// `y` is the middle of the em box.
    Middle,
    /// `y` is the top of the em box.
    Top,
}

/// Shrink `font` one pixel at a time until `text` fits in `max_width` or the
/// size reaches `min_size`.
pub fn shrink_to_width<M: MeasureText + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    max_width: f32,
    min_size: f32,
) -> FontSpec {
    let mut spec = font.clone();
    while spec.size_px > min_size && measurer.measure_text(text, &spec) > max_width {
        spec = spec.with_size((spec.size_px - 1.0).max(min_size));
    }
    spec
}
