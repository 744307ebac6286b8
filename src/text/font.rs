//! Typefaces, glyph masks and text metrics.
//!
//! Two kinds of typeface are supported:
//!
//! - **Bitmap**: the Spleen 12×24 font compiled into the binary. Always
//!   available, so rendering never depends on font files being installed.
//!   Glyphs are box-filtered to the requested pixel size and bold weights are
//!   produced by horizontal dilation.
//! - **Outline**: TrueType/OpenType families loaded from disk and rasterized
//!   with ab_glyph (anti-aliased).
//!
//! Text renders into a [`TextMask`]: an f32 coverage buffer that the canvas
//! composites in any color.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::FontEntry;
use crate::error::BannerError;

pub const REGULAR: u16 = 400;
pub const BOLD: u16 = 700;
pub const BLACK: u16 = 900;

const SPLEEN_WIDTH: usize = 12;
const SPLEEN_HEIGHT: usize = 24;
/// Advance of a bitmap glyph relative to the font size.
const BITMAP_ADVANCE: f32 = SPLEEN_WIDTH as f32 / SPLEEN_HEIGHT as f32;
/// Baseline position within the bitmap cell, relative to the font size.
const BITMAP_ASCENT: f32 = 0.8;
/// Supersampling grid used when box-filtering bitmap glyphs.
const SUPERSAMPLE: usize = 4;

/// A loaded typeface.
pub enum Typeface {
    /// Built-in Spleen bitmap font.
    Bitmap,
    /// Outline font loaded from disk.
    Outline {
        family: String,
        regular: FontArc,
        bold: Option<FontArc>,
    },
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::Bitmap => write!(f, "Typeface::Bitmap"),
            Typeface::Outline { family, bold, .. } => f
                .debug_struct("Typeface::Outline")
                .field("family", family)
                .field("has_bold", &bold.is_some())
                .finish(),
        }
    }
}

/// A typeface at a specific size and weight.
#[derive(Debug, Clone)]
pub struct FontSpec {
    pub face: Arc<Typeface>,
    pub size_px: f32,
    pub weight: u16,
}

impl FontSpec {
    pub fn new(face: Arc<Typeface>, size_px: f32, weight: u16) -> Self {
        Self {
            face,
            size_px,
            weight,
        }
    }

    pub fn with_size(&self, size_px: f32) -> Self {
        Self {
            face: Arc::clone(&self.face),
            size_px,
            weight: self.weight,
        }
    }

    pub fn with_weight(&self, weight: u16) -> Self {
        Self {
            face: Arc::clone(&self.face),
            size_px: self.size_px,
            weight,
        }
    }

    /// Ascent and descent (both positive) in pixels.
    pub fn vertical_metrics(&self) -> (f32, f32) {
        match self.face.as_ref() {
            Typeface::Bitmap => (
                self.size_px * BITMAP_ASCENT,
                self.size_px * (1.0 - BITMAP_ASCENT),
            ),
            Typeface::Outline { .. } => {
                let font = self.outline_font();
                match font {
                    Some(font) => {
                        let scaled = font.as_scaled(px_scale(font, self.size_px));
                        (scaled.ascent(), -scaled.descent())
                    }
                    None => (self.size_px * BITMAP_ASCENT, self.size_px * 0.2),
                }
            }
        }
    }

    /// Extra horizontal pixels added by synthetic emboldening.
    fn embolden_px(&self) -> usize {
        let has_real_bold = matches!(
            self.face.as_ref(),
            Typeface::Outline { bold: Some(_), .. }
        );
        let size = self.size_px;
        if self.weight >= BLACK {
            let extra = if has_real_bold { size / 24.0 } else { size / 10.0 };
            extra.round().max(1.0) as usize
        } else if self.weight >= 600 && !has_real_bold {
            (size / 18.0).round().max(1.0) as usize
        } else {
            0
        }
    }

    fn outline_font(&self) -> Option<&FontArc> {
        match self.face.as_ref() {
            Typeface::Bitmap => None,
            Typeface::Outline { regular, bold, .. } => {
                if self.weight >= 600 {
                    Some(bold.as_ref().unwrap_or(regular))
                } else {
                    Some(regular)
                }
            }
        }
    }
}

/// Convert a CSS-style em size to an ab_glyph scale.
fn px_scale(font: &FontArc, size_px: f32) -> PxScale {
    let units = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size_px * font.height_unscaled() / units)
}

/// Advance width of `text` in pixels.
pub fn measure(spec: &FontSpec, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }

    let advance = match spec.outline_font() {
        None => text.chars().count() as f32 * spec.size_px * BITMAP_ADVANCE,
        Some(font) => {
            let scaled = font.as_scaled(px_scale(font, spec.size_px));
            let mut width = 0.0f32;
            let mut prev = None;
            for ch in text.chars() {
                let id = font.glyph_id(ch);
                if let Some(p) = prev {
                    width += scaled.kern(p, id);
                }
                width += scaled.h_advance(id);
                prev = Some(id);
            }
            width
        }
    };

    advance + spec.embolden_px() as f32
}

/// Anti-aliased coverage of a run of text.
///
/// Pixel `(0, 0)` of the mask sits `pad` pixels left of the text origin and
/// `ascent` pixels above the baseline.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    /// Coverage per pixel, 0.0 = empty, 1.0 = fully covered.
    pub data: Vec<f32>,
    /// Horizontal padding on the left of the text origin.
    pub pad: usize,
    /// Distance from the top of the mask to the baseline.
    pub ascent: f32,
}

impl TextMask {
    fn new(width: usize, height: usize, pad: usize, ascent: f32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
            pad,
            ascent,
        }
    }

    #[inline]
    fn accumulate(&mut self, x: i64, y: i64, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = (self.data[idx] + coverage).min(1.0);
    }

    /// Horizontal dilation by `px` pixels (synthetic bold).
    fn dilate(&mut self, px: usize) {
        if px == 0 {
            return;
        }
        let src = self.data.clone();
        for y in 0..self.height {
            let row = y * self.width;
            for x in 0..self.width {
                let from = x.saturating_sub(px);
                let mut v = 0.0f32;
                for sx in from..=x {
                    v = v.max(src[row + sx]);
                }
                self.data[row + x] = v;
            }
        }
    }

    /// True if no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }
}

/// Render `text` into a coverage mask.
pub fn rasterize(spec: &FontSpec, text: &str) -> TextMask {
    let pad = 2usize;
    let (ascent, descent) = spec.vertical_metrics();
    let width = measure(spec, text).ceil() as usize + pad * 2 + 1;
    let height = (ascent + descent).ceil() as usize + 2;

    let mut mask = TextMask::new(width.max(1), height.max(1), pad, ascent);

    match spec.outline_font() {
        None => draw_bitmap_run(&mut mask, spec, text),
        Some(font) => draw_outline_run(&mut mask, font, spec.size_px, text),
    }

    mask.dilate(spec.embolden_px());
    mask
}

/// Box-filter Spleen glyphs into the mask.
fn draw_bitmap_run(mask: &mut TextMask, spec: &FontSpec, text: &str) {
    let cell_w = spec.size_px * BITMAP_ADVANCE;
    let cell_h = spec.size_px;
    let cell_top = mask.ascent - spec.size_px * BITMAP_ASCENT;

    // A missing font table degrades to box glyphs rather than failing.
    let mut spleen = PSF2Font::new(FONT_12X24).ok();
    let mut buf = [0u8; 4];

    let mut caret = mask.pad as f32;
    for ch in text.chars() {
        let glyph = match spleen.as_mut() {
            Some(font) => spleen_glyph(font, ch.encode_utf8(&mut buf).as_bytes()),
            None => None,
        }
        .unwrap_or_else(|| box_glyph(ch));

        let x0 = caret.floor() as i64;
        let x1 = (caret + cell_w).ceil() as i64;
        let y0 = cell_top.floor() as i64;
        let y1 = (cell_top + cell_h).ceil() as i64;

        for py in y0..y1 {
            for px in x0..x1 {
                let mut hits = 0usize;
                for sy in 0..SUPERSAMPLE {
                    let fy = py as f32 + (sy as f32 + 0.5) / SUPERSAMPLE as f32;
                    let row = ((fy - cell_top) / cell_h * SPLEEN_HEIGHT as f32).floor();
                    if row < 0.0 || row >= SPLEEN_HEIGHT as f32 {
                        continue;
                    }
                    for sx in 0..SUPERSAMPLE {
                        let fx = px as f32 + (sx as f32 + 0.5) / SUPERSAMPLE as f32;
                        let col = ((fx - caret) / cell_w * SPLEEN_WIDTH as f32).floor();
                        if col < 0.0 || col >= SPLEEN_WIDTH as f32 {
                            continue;
                        }
                        if glyph[row as usize * SPLEEN_WIDTH + col as usize] {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    let coverage = hits as f32 / (SUPERSAMPLE * SUPERSAMPLE) as f32;
                    mask.accumulate(px, py, coverage);
                }
            }
        }

        caret += cell_w;
    }
}

/// Collect a Spleen glyph into a 12×24 bit grid.
fn spleen_glyph(font: &mut PSF2Font, utf8: &[u8]) -> Option<Vec<bool>> {
    let glyph = font.glyph_for_utf8(utf8)?;
    let mut bits = vec![false; SPLEEN_WIDTH * SPLEEN_HEIGHT];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < SPLEEN_HEIGHT && col_x < SPLEEN_WIDTH {
                bits[row_y * SPLEEN_WIDTH + col_x] = on;
            }
        }
    }
    Some(bits)
}

/// Outline box for characters the bitmap font does not cover.
fn box_glyph(ch: char) -> Vec<bool> {
    let mut bits = vec![false; SPLEEN_WIDTH * SPLEEN_HEIGHT];
    if ch.is_whitespace() {
        return bits;
    }
    for y in 6..20 {
        for x in 2..10 {
            if y == 6 || y == 19 || x == 2 || x == 9 {
                bits[y * SPLEEN_WIDTH + x] = true;
            }
        }
    }
    bits
}

/// Rasterize outline glyphs with ab_glyph.
fn draw_outline_run(mask: &mut TextMask, font: &FontArc, size_px: f32, text: &str) {
    let scale = px_scale(font, size_px);
    let scaled = font.as_scaled(scale);
    let baseline = mask.ascent;

    let mut caret = mask.pad as f32;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = gx as i64 + bounds.min.x as i64;
                let y = gy as i64 + bounds.min.y as i64;
                mask.accumulate(x, y, coverage);
            });
        }
    }
}

/// Normalize a family name or CSS font stack to a registry key:
/// first family of the stack, unquoted, lowercase, without spaces, dashes
/// or underscores. `"Open Sans", sans-serif` → `opensans`.
pub fn normalize_family(name: &str) -> String {
    let first = name.split(',').next().unwrap_or("");
    first
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Registry of typefaces available to a render.
#[derive(Debug, Clone)]
pub struct FontBook {
    default: Arc<Typeface>,
    families: HashMap<String, Arc<Typeface>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::bitmap()
    }
}

impl FontBook {
    /// A book containing only the built-in bitmap face.
    pub fn bitmap() -> Self {
        Self {
            default: Arc::new(Typeface::Bitmap),
            families: HashMap::new(),
        }
    }

    /// Load every configured family from disk. The first entry becomes the
    /// default face.
    pub fn from_entries(entries: &[FontEntry]) -> Result<Self, BannerError> {
        let mut book = Self::bitmap();
        for (i, entry) in entries.iter().enumerate() {
            let regular = std::fs::read(&entry.regular).map_err(|e| {
                BannerError::Font(format!("Failed to read {}: {}", entry.regular.display(), e))
            })?;
            let bold = match &entry.bold {
                Some(path) => Some(std::fs::read(path).map_err(|e| {
                    BannerError::Font(format!("Failed to read {}: {}", path.display(), e))
                })?),
                None => None,
            };
            book.register(&entry.family, regular, bold)?;
            if i == 0 {
                book.default = book.resolve(Some(&entry.family));
            }
        }
        Ok(book)
    }

    /// Register an outline family from raw font file bytes.
    pub fn register(
        &mut self,
        family: &str,
        regular: Vec<u8>,
        bold: Option<Vec<u8>>,
    ) -> Result<(), BannerError> {
        let regular = FontArc::try_from_vec(regular)
            .map_err(|e| BannerError::Font(format!("Invalid font for {}: {}", family, e)))?;
        let bold = match bold {
            Some(bytes) => Some(FontArc::try_from_vec(bytes).map_err(|e| {
                BannerError::Font(format!("Invalid bold font for {}: {}", family, e))
            })?),
            None => None,
        };

        let key = normalize_family(family);
        tracing::debug!(family = %key, has_bold = bold.is_some(), "Registered font family");
        self.families.insert(
            key,
            Arc::new(Typeface::Outline {
                family: family.to_string(),
                regular,
                bold,
            }),
        );
        Ok(())
    }

    /// Look up a family, falling back to the default face.
    pub fn resolve(&self, family: Option<&str>) -> Arc<Typeface> {
        family
            .map(normalize_family)
            .and_then(|key| self.families.get(&key))
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.default))
    }

    /// Convenience: resolve a family and size it.
    pub fn spec(&self, family: Option<&str>, size_px: f32, weight: u16) -> FontSpec {
        FontSpec::new(self.resolve(family), size_px, weight)
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(size: f32, weight: u16) -> FontSpec {
        FontBook::bitmap().spec(None, size, weight)
    }

    #[test]
    fn test_bitmap_measure_is_monospace() {
        let spec = bitmap(24.0, REGULAR);
        assert_eq!(measure(&spec, "ABC"), 36.0);
        assert_eq!(measure(&spec, ""), 0.0);
        assert_eq!(measure(&spec.with_size(12.0), "ABCD"), 24.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = bitmap(18.0, REGULAR);
        let bold = regular.with_weight(BOLD);
        let black = regular.with_weight(BLACK);
        assert!(measure(&bold, "SALE") > measure(&regular, "SALE"));
        assert!(measure(&black, "SALE") > measure(&bold, "SALE"));
    }

    #[test]
    fn test_rasterize_produces_coverage() {
        let mask = rasterize(&bitmap(24.0, REGULAR), "Hello");
        assert!(mask.width >= 60);
        assert_eq!(mask.data.len(), mask.width * mask.height);
        assert!(!mask.is_blank());
    }

    #[test]
    fn test_rasterize_space_is_blank() {
        let mask = rasterize(&bitmap(24.0, REGULAR), "   ");
        assert!(mask.is_blank());
    }

    #[test]
    fn test_downscaled_glyphs_are_anti_aliased() {
        let mask = rasterize(&bitmap(13.0, REGULAR), "Smooth");
        assert!(mask.data.iter().any(|&v| v > 0.01 && v < 0.99));
    }

    #[test]
    fn test_unknown_glyph_draws_box() {
        let bits = box_glyph('\u{10FFFF}');
        assert!(bits.iter().any(|&b| b));
        assert!(box_glyph(' ').iter().all(|&b| !b));
    }

    #[test]
    fn test_normalize_family() {
        assert_eq!(normalize_family("Open Sans"), "opensans");
        assert_eq!(normalize_family("\"Roboto\", sans-serif"), "roboto");
        assert_eq!(normalize_family("Source_Sans-Pro"), "sourcesanspro");
    }

    #[test]
    fn test_resolve_unknown_family_uses_default() {
        let book = FontBook::bitmap();
        assert!(matches!(*book.resolve(Some("Montserrat")), Typeface::Bitmap));
        assert!(matches!(*book.resolve(None), Typeface::Bitmap));
        assert_eq!(book.family_count(), 0);
    }

    #[test]
    fn test_register_rejects_garbage() {
        let mut book = FontBook::bitmap();
        let err = book.register("Broken", vec![0, 1, 2, 3], None).unwrap_err();
        assert!(matches!(err, BannerError::Font(_)));
    }

    #[test]
    fn test_missing_font_file_is_error() {
        let entries = vec![FontEntry {
            family: "Inter".into(),
            regular: "/nonexistent/Inter-Regular.ttf".into(),
            bold: None,
        }];
        assert!(matches!(
            FontBook::from_entries(&entries),
            Err(BannerError::Font(_))
        ));
    }
}
