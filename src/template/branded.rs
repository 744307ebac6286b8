//! Branded template.
//!
//! The source image is drawn full-bleed and the headline sits over its
//! lower part in one of three treatments:
//!
//! | Variant | Treatment |
//! |---------|-----------|
//! | 1 [`LineHighlight`](Variant::LineHighlight) | Brand-colored box behind each left-aligned line |
//! | 2 [`StructuredPlaque`](Variant::StructuredPlaque) | White plaque: kicker box, heavy headline, grey subhead |
//! | 3 [`Embossed`](Variant::Embossed) | Centered kicker box, embossed white lines over the image |
//!
//! Brand colors come from [`BrandingData`]; missing or unparseable colors
//! fall back to a generic red.

use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::color::brightness::{is_light, region_luma};
use crate::color::{Rgb, parse_css_color};
use crate::error::BannerError;
use crate::render::canvas::{Paint, Rasterizer, Rect, TextStyle};
use crate::render::compositor::draw_cover;
use crate::request::BrandingData;
use crate::text::fit::{BRANDED_LINE_HEIGHT, fit_branded};
use crate::text::font::{BLACK, BOLD, FontSpec, REGULAR};
use crate::text::{FontBook, LayoutResult, MeasureText, TextAlign, TextBaseline, shrink_to_width};

use super::Variant;
use super::standard::paint_backdrop;

/// Brand color used when the branding data has none.
pub const DEFAULT_BRAND_COLOR: Rgba<u8> = Rgba([220, 20, 20, 242]);

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HEADLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const SUBHEAD_COLOR: Rgb = Rgb::from_hex(0x4b5563);
const EMBOSS_DARK: Rgba<u8> = Rgba([0, 0, 0, 153]);
const EMBOSS_LIGHT: Rgba<u8> = Rgba([255, 255, 255, 89]);

/// Left edge of left-aligned text.
const LEFT_PADDING: f32 = 12.0;
/// Gap between the last text line and the canvas bottom.
const BOTTOM_MARGIN: f32 = 16.0;
/// Padding of line highlight boxes; boxes are `font_size + 6` tall.
const HIGHLIGHT_PADDING: f32 = 6.0;
/// Horizontal padding inside kicker boxes.
const KICKER_PADDING: f32 = 8.0;
const PLAQUE_RADIUS: f32 = 4.0;
const PLAQUE_PADDING: f32 = 12.0;
const PLAQUE_GAP: f32 = 6.0;
const KICKER_SCALE: f32 = 0.8;
const HEADLINE_SCALE: f32 = 1.1;
const SUBHEAD_SCALE: f32 = 0.9;
/// Smallest size auto-shrinking may reach.
const SHRINK_FLOOR: f32 = 8.0;
/// Embossed lines must fit this share of the canvas width.
const EMBOSS_WIDTH_RATIO: f32 = 0.9;

/// Colors and face resolved from branding data.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandStyle {
    /// Highlight boxes and the plaque kicker.
    pub primary: Rgba<u8>,
    /// Kicker box of the embossed variant (second brand color if any).
    pub accent: Rgba<u8>,
    pub family: Option<String>,
}

impl BrandStyle {
    pub fn from_branding(branding: Option<&BrandingData>) -> Self {
        let primary = branding
            .and_then(BrandingData::primary_color)
            .and_then(parse_css_color);
        let secondary = branding
            .and_then(BrandingData::secondary_color)
            .and_then(parse_css_color);
        let family = branding
            .and_then(BrandingData::font_family)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let primary = primary.unwrap_or(DEFAULT_BRAND_COLOR);
        Self {
            primary,
            accent: secondary.unwrap_or(primary),
            family,
        }
    }
}

/// One line of a plaque with its resolved font, color and optional box.
#[derive(Debug, Clone)]
pub struct PlaqueRow {
    pub text: String,
    pub font: FontSpec,
    pub color: Rgba<u8>,
    pub x: f32,
    pub center_y: f32,
    /// Kicker background and its color.
    pub background: Option<(Rect, Rgba<u8>)>,
}

/// Geometry of the structured plaque variant.
#[derive(Debug, Clone)]
pub struct PlaqueLayout {
    pub plaque: Rect,
    pub rows: Vec<PlaqueRow>,
}

/// Compose a branded banner onto `canvas`.
#[allow(clippy::too_many_arguments)]
pub fn compose<R: Rng + ?Sized>(
    canvas: &mut dyn Rasterizer,
    image: &RgbaImage,
    headline: &str,
    variant: Variant,
    branding: Option<&BrandingData>,
    is_uploaded: bool,
    fonts: &FontBook,
    rng: &mut R,
) -> Result<(), BannerError> {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let full = Rect::new(0.0, 0.0, w, h);

    paint_backdrop(canvas, image, full, is_uploaded, rng);
    draw_cover(canvas, image, full)?;

    let brand = BrandStyle::from_branding(branding);
    let font = fonts.spec(brand.family.as_deref(), 32.0, BOLD);
    let layout = fit_branded(&*canvas, headline, w, h, variant, &font);
    if layout.lines.is_empty() {
        return Ok(());
    }
    let font = font.with_size(layout.font_size_px);

    match variant {
        Variant::LineHighlight => {
            log_text_brightness(&*canvas, text_region(&layout, variant, w, h), variant);
            draw_line_highlight(canvas, &layout, &font, &brand);
        }
        Variant::StructuredPlaque => {
            let plan = plan_structured_plaque(&*canvas, &layout, &font, &brand, w, h);
            log_text_brightness(&*canvas, plan.plaque, variant);
            draw_structured_plaque(canvas, &plan);
        }
        Variant::Embossed => {
            log_text_brightness(&*canvas, text_region(&layout, variant, w, h), variant);
            draw_embossed(canvas, &layout, &font, &brand);
        }
    }
    Ok(())
}

/// Top of a bottom-anchored text block.
fn block_top(layout: &LayoutResult, height: f32) -> f32 {
    height - BOTTOM_MARGIN - layout.block_height()
}

/// Area the fitted text block occupies: left-aligned for line highlights,
/// centered for embossed text. The plaque variant measures its plaque.
fn text_region(layout: &LayoutResult, variant: Variant, width: f32, height: f32) -> Rect {
    let top = block_top(layout, height);
    let block = layout.block_height();
    match variant {
        Variant::Embossed => Rect::new(
            (width - layout.max_width_px) / 2.0,
            top,
            layout.max_width_px,
            block,
        ),
        _ => Rect::new(
            LEFT_PADDING - HIGHLIGHT_PADDING,
            top,
            layout.max_width_px + HIGHLIGHT_PADDING * 2.0,
            block,
        ),
    }
}

/// Mean luma under the text. Measured for diagnostics only: every variant
/// draws its own text background.
fn log_text_brightness(canvas: &dyn Rasterizer, region: Rect, variant: Variant) {
    let luma = region_luma(
        canvas.pixels(),
        region.x.floor() as i64,
        region.y.floor() as i64,
        region.width.ceil() as i64,
        region.height.ceil() as i64,
    );
    match luma {
        Some(luma) => tracing::debug!(
            ?variant,
            luma,
            light = is_light(luma),
            "Text region brightness"
        ),
        None => tracing::debug!(?variant, "Text region is empty"),
    }
}

/// Highlight box behind each line, vertically centered on the line.
fn highlight_boxes<M: MeasureText + ?Sized>(
    measurer: &M,
    layout: &LayoutResult,
    font: &FontSpec,
    height: f32,
) -> Vec<Rect> {
    let lh = layout.line_height_px;
    let top = block_top(layout, height);
    let box_height = layout.font_size_px + HIGHLIGHT_PADDING;

    layout
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let center_y = top + i as f32 * lh + lh / 2.0;
            Rect::new(
                LEFT_PADDING - HIGHLIGHT_PADDING,
                center_y - box_height / 2.0,
                measurer.measure_text(line, font) + HIGHLIGHT_PADDING * 2.0,
                box_height,
            )
        })
        .collect()
}

fn draw_line_highlight(
    canvas: &mut dyn Rasterizer,
    layout: &LayoutResult,
    font: &FontSpec,
    brand: &BrandStyle,
) {
    let h = canvas.height() as f32;
    let boxes = highlight_boxes(&*canvas, layout, font, h);
    let style = TextStyle::new(font.clone(), WHITE).baseline(TextBaseline::Middle);

    for (line, background) in layout.lines.iter().zip(boxes) {
        canvas.fill_rect(background, &Paint::Solid(brand.primary));
        let center_y = background.y + background.height / 2.0;
        canvas.fill_text(line, LEFT_PADDING, center_y, &style);
    }
}

/// Lay out the plaque variant: first line is the kicker, second the
/// headline, the rest subhead. A single line is treated as the headline.
pub fn plan_structured_plaque<M: MeasureText + ?Sized>(
    measurer: &M,
    layout: &LayoutResult,
    font: &FontSpec,
    brand: &BrandStyle,
    width: f32,
    height: f32,
) -> PlaqueLayout {
    let fs = layout.font_size_px;
    let usable = (width - PLAQUE_PADDING * 2.0).max(0.0);

    let (kicker, rest) = match layout.lines.as_slice() {
        [only] => (None, std::slice::from_ref(only)),
        [first, rest @ ..] => (Some(first), rest),
        [] => (None, &[][..]),
    };

    // Resolve fonts first; the plaque height depends on them
    let kicker_font = kicker.map(|text| {
        let base = font.with_size(fs * KICKER_SCALE).with_weight(BOLD);
        shrink_to_width(measurer, text, &base, usable - KICKER_PADDING * 2.0, SHRINK_FLOOR)
    });
    let body: Vec<(&String, FontSpec, Rgba<u8>)> = rest
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let (base, color) = if i == 0 {
                (font.with_size(fs * HEADLINE_SCALE).with_weight(BLACK), HEADLINE_COLOR)
            } else {
                (
                    font.with_size(fs * SUBHEAD_SCALE).with_weight(REGULAR),
                    SUBHEAD_COLOR.to_rgba(),
                )
            };
            let spec = shrink_to_width(measurer, text, &base, usable, SHRINK_FLOOR);
            (text, spec, color)
        })
        .collect();

    let kicker_height = kicker_font
        .as_ref()
        .map(|f| f.size_px + HIGHLIGHT_PADDING + PLAQUE_GAP)
        .unwrap_or(0.0);
    let body_height: f32 = body
        .iter()
        .map(|(_, f, _)| f.size_px * BRANDED_LINE_HEIGHT)
        .sum();
    let stack = PLAQUE_PADDING * 2.0 + kicker_height + body_height;
    let top = (height - stack).max(0.0);

    let mut rows = Vec::with_capacity(layout.lines.len());
    let mut y = top + PLAQUE_PADDING;

    if let (Some(text), Some(kf)) = (kicker, kicker_font) {
        let text_width = measurer.measure_text(text, &kf);
        let box_height = kf.size_px + HIGHLIGHT_PADDING;
        let background = Rect::new(
            PLAQUE_PADDING,
            y,
            text_width + KICKER_PADDING * 2.0,
            box_height,
        );
        rows.push(PlaqueRow {
            text: text.clone(),
            font: kf,
            color: WHITE,
            x: PLAQUE_PADDING + KICKER_PADDING,
            center_y: y + box_height / 2.0,
            background: Some((background, brand.primary)),
        });
        y += box_height + PLAQUE_GAP;
    }

    for (text, spec, color) in body {
        let lh = spec.size_px * BRANDED_LINE_HEIGHT;
        rows.push(PlaqueRow {
            text: text.clone(),
            font: spec,
            color,
            x: PLAQUE_PADDING,
            center_y: y + lh / 2.0,
            background: None,
        });
        y += lh;
    }

    PlaqueLayout {
        plaque: Rect::new(0.0, top, width, height - top),
        rows,
    }
}

fn draw_structured_plaque(canvas: &mut dyn Rasterizer, plan: &PlaqueLayout) {
    canvas.fill_round_rect(plan.plaque, PLAQUE_RADIUS, &Paint::Solid(WHITE));
    for row in &plan.rows {
        if let Some((background, color)) = row.background {
            canvas.fill_rect(background, &Paint::Solid(color));
        }
        let style = TextStyle::new(row.font.clone(), row.color).baseline(TextBaseline::Middle);
        canvas.fill_text(&row.text, row.x, row.center_y, &style);
    }
}

/// Shrink `font` a pixel at a time until every line fits `max_width`.
fn emboss_font<M: MeasureText + ?Sized>(
    measurer: &M,
    lines: &[String],
    font: &FontSpec,
    max_width: f32,
) -> FontSpec {
    let mut body_font = font.clone();
    while body_font.size_px > SHRINK_FLOOR
        && lines
            .iter()
            .any(|line| measurer.measure_text(line, &body_font) > max_width)
    {
        body_font = body_font.with_size((body_font.size_px - 1.0).max(SHRINK_FLOOR));
    }
    body_font
}

/// Distance of the dark emboss copy; the light copy sits at half of it.
fn emboss_offset(font_size: f32) -> f32 {
    (font_size * 0.02).max(1.0)
}

fn draw_embossed(
    canvas: &mut dyn Rasterizer,
    layout: &LayoutResult,
    font: &FontSpec,
    brand: &BrandStyle,
) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let fs = layout.font_size_px;
    let lh = layout.line_height_px;
    let top = block_top(layout, h);
    let cx = w / 2.0;

    let (kicker, body) = match layout.lines.as_slice() {
        [only] => (None, std::slice::from_ref(only)),
        [first, rest @ ..] => (Some(first), rest),
        [] => (None, &[][..]),
    };

    let mut row = 0usize;
    if let Some(text) = kicker {
        let center_y = top + lh / 2.0;
        let text_width = canvas.measure_text(text, font);
        let box_height = fs + HIGHLIGHT_PADDING;
        canvas.fill_rect(
            Rect::new(
                cx - text_width / 2.0 - KICKER_PADDING,
                center_y - box_height / 2.0,
                text_width + KICKER_PADDING * 2.0,
                box_height,
            ),
            &Paint::Solid(brand.accent),
        );
        let style = TextStyle::new(font.clone(), WHITE)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        canvas.fill_text(text, cx, center_y, &style);
        row = 1;
    }

    let body_font = emboss_font(&*canvas, body, font, w * EMBOSS_WIDTH_RATIO);
    let offset = emboss_offset(body_font.size_px);
    let style = TextStyle::new(body_font, WHITE)
        .align(TextAlign::Center)
        .baseline(TextBaseline::Middle);
    let dark = style.with_color(EMBOSS_DARK);
    let light = style.with_color(EMBOSS_LIGHT);

    for (i, line) in body.iter().enumerate() {
        let center_y = top + (row + i) as f32 * lh + lh / 2.0;
        canvas.fill_text(line, cx + offset, center_y + offset, &dark);
        canvas.fill_text(line, cx - offset / 2.0, center_y - offset / 2.0, &light);
        canvas.fill_text(line, cx, center_y, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::SoftwareCanvas;
    use crate::text::GlyphMeasure;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const PHOTO: Rgba<u8> = Rgba([30, 120, 60, 255]);

    fn branding(colors: &[&str]) -> BrandingData {
        BrandingData {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            ..BrandingData::default()
        }
    }

    fn render(variant: Variant, headline: &str, brand: Option<&BrandingData>) -> RgbaImage {
        let fonts = FontBook::bitmap();
        let mut canvas = SoftwareCanvas::new(300, 250);
        let mut rng = StdRng::seed_from_u64(3);
        let image = RgbaImage::from_pixel(10, 10, PHOTO);
        compose(&mut canvas, &image, headline, variant, brand, false, &fonts, &mut rng).unwrap();
        canvas.into_image()
    }

    #[test]
    fn test_brand_style_defaults() {
        let style = BrandStyle::from_branding(None);
        assert_eq!(style.primary, DEFAULT_BRAND_COLOR);
        assert_eq!(style.accent, DEFAULT_BRAND_COLOR);
        assert_eq!(style.family, None);

        let garbage = branding(&["definitely-not-a-color"]);
        assert_eq!(BrandStyle::from_branding(Some(&garbage)).primary, DEFAULT_BRAND_COLOR);
    }

    #[test]
    fn test_brand_style_uses_first_two_colors() {
        let data = BrandingData {
            fonts: vec!["  Inter ".into()],
            ..branding(&["#0044ff", "rgb(255, 204, 0)", "#000000"])
        };
        let style = BrandStyle::from_branding(Some(&data));
        assert_eq!(style.primary, Rgba([0, 0x44, 0xff, 255]));
        assert_eq!(style.accent, Rgba([255, 204, 0, 255]));
        assert_eq!(style.family.as_deref(), Some("Inter"));
    }

    #[test]
    fn test_line_highlight_boxes_use_brand_color() {
        let data = branding(&["#0044ff"]);
        let out = render(Variant::LineHighlight, "Big summer sale", Some(&data));
        // Left padding of the highlight box, inside the bottom text block
        let found = (150..234).any(|y| *out.get_pixel(7, y) == Rgba([0, 0x44, 0xff, 255]));
        assert!(found);
        // Image untouched at the top
        assert_eq!(*out.get_pixel(150, 5), PHOTO);
    }

    #[test]
    fn test_line_highlight_box_geometry() {
        let font = FontBook::bitmap().spec(None, 20.0, BOLD);
        let layout = LayoutResult {
            lines: vec!["Big summer".into(), "sale".into()],
            font_size_px: 20.0,
            line_height_px: 24.0,
            max_width_px: 240.0,
        };
        let boxes = highlight_boxes(&GlyphMeasure, &layout, &font, 250.0);
        assert_eq!(boxes.len(), 2);

        for (line, rect) in layout.lines.iter().zip(&boxes) {
            let text_width = GlyphMeasure.measure_text(line, &font);
            assert_eq!(rect.height, 26.0);
            assert_eq!(rect.x, LEFT_PADDING - 6.0);
            assert_eq!(rect.width, text_width + 12.0);
        }
        // Block bottom sits BOTTOM_MARGIN above the canvas edge; boxes center on lines
        assert_eq!(boxes[0].y, 250.0 - 16.0 - 48.0 + 12.0 - 13.0);
        assert_eq!(boxes[1].y - boxes[0].y, 24.0);
    }

    #[test]
    fn test_text_region_follows_alignment() {
        let layout = LayoutResult {
            lines: vec!["One".into(), "Two".into()],
            font_size_px: 20.0,
            line_height_px: 24.0,
            max_width_px: 216.0,
        };
        let centered = text_region(&layout, Variant::Embossed, 300.0, 250.0);
        assert_eq!((centered.x + centered.right()) / 2.0, 150.0);
        assert_eq!(centered.bottom(), 250.0 - BOTTOM_MARGIN);

        let left = text_region(&layout, Variant::LineHighlight, 300.0, 250.0);
        assert_eq!(left.x, LEFT_PADDING - HIGHLIGHT_PADDING);
        assert_eq!(left.y, centered.y);
    }

    #[test]
    fn test_emboss_offset() {
        assert_eq!(emboss_offset(12.0), 1.0);
        assert_eq!(emboss_offset(100.0), 2.0);
    }

    #[test]
    fn test_embossed_overlong_word_shrinks_to_fit() {
        let word = "Supercalifragilistic";
        let font = FontBook::bitmap().spec(None, 64.0, BOLD);
        assert!(GlyphMeasure.measure_text(word, &font) > 540.0);
        let lines = vec![word.to_string()];
        assert_eq!(emboss_font(&GlyphMeasure, &lines, &font, 540.0).size_px, 54.0);

        let mut canvas = SoftwareCanvas::new(600, 300);
        canvas.fill_rect(Rect::new(0.0, 0.0, 600.0, 300.0), &Paint::Solid(PHOTO));
        let layout = LayoutResult {
            lines,
            font_size_px: 64.0,
            line_height_px: 76.8,
            max_width_px: 432.0,
        };
        draw_embossed(&mut canvas, &layout, &font, &BrandStyle::from_branding(None));
        let out = canvas.into_image();

        // Every painted pixel stays within the middle 90% (plus the shadow offset)
        let painted: Vec<(u32, u32)> = out
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != PHOTO)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&(x, _)| (28..=573).contains(&x)));

        // Dark copy peeks out below-right of the solid white face
        let shadowed = out.enumerate_pixels().any(|(x, y, p)| {
            *p == WHITE && y + 1 < 300 && out.get_pixel(x + 1, y + 1)[1] < 100
        });
        assert!(shadowed);
    }

    #[test]
    fn test_structured_plaque_kicker_box_covers_text() {
        let fonts = FontBook::bitmap();
        let font = fonts.spec(None, 32.0, BOLD);
        let layout = fit_branded(
            &GlyphMeasure,
            "Neue Kollektion jetzt im Shop entdecken",
            300.0,
            250.0,
            Variant::StructuredPlaque,
            &font,
        );
        assert!(layout.lines.len() >= 2);
        let font = font.with_size(layout.font_size_px);
        let brand = BrandStyle::from_branding(None);
        let plan = plan_structured_plaque(&GlyphMeasure, &layout, &font, &brand, 300.0, 250.0);

        let kicker = &plan.rows[0];
        let (background, color) = kicker.background.unwrap();
        assert_eq!(color, DEFAULT_BRAND_COLOR);
        let text_width = GlyphMeasure.measure_text(&kicker.text, &kicker.font);
        assert!(background.width >= text_width);
        assert!(background.x <= kicker.x);
        assert!(background.right() >= kicker.x + text_width);

        // Plaque spans to the bottom and contains every row
        assert_eq!(plan.plaque.bottom(), 250.0);
        assert!(plan.rows.iter().all(|r| r.center_y > plan.plaque.y));
        // Headline is heavier than the subhead
        assert_eq!(plan.rows[1].font.weight, BLACK);
        if let Some(sub) = plan.rows.get(2) {
            assert_eq!(sub.font.weight, REGULAR);
        }
    }

    #[test]
    fn test_structured_plaque_shrinks_long_lines() {
        let fonts = FontBook::bitmap();
        let font = fonts.spec(None, 20.0, BOLD);
        let layout = LayoutResult {
            lines: vec!["KICK".into(), "Extraordinarilylongheadlinewordthatoverflows".into()],
            font_size_px: 20.0,
            line_height_px: 24.0,
            max_width_px: 204.0,
        };
        let brand = BrandStyle::from_branding(None);
        let plan = plan_structured_plaque(&GlyphMeasure, &layout, &font, &brand, 300.0, 250.0);
        let main = &plan.rows[1];
        assert!(main.font.size_px < 22.0);
        assert!(main.font.size_px >= SHRINK_FLOOR);
    }

    #[test]
    fn test_single_line_plaque_has_no_kicker() {
        let fonts = FontBook::bitmap();
        let font = fonts.spec(None, 20.0, BOLD);
        let layout = LayoutResult {
            lines: vec!["Sale".into()],
            font_size_px: 20.0,
            line_height_px: 24.0,
            max_width_px: 204.0,
        };
        let brand = BrandStyle::from_branding(None);
        let plan = plan_structured_plaque(&GlyphMeasure, &layout, &font, &brand, 300.0, 250.0);
        assert_eq!(plan.rows.len(), 1);
        assert!(plan.rows[0].background.is_none());
    }

    #[test]
    fn test_structured_plaque_is_white() {
        let out = render(Variant::StructuredPlaque, "Neue Kollektion jetzt im Shop", None);
        // Right edge of the plaque just above the bottom is plain white
        assert_eq!(*out.get_pixel(295, 245), WHITE);
        assert_eq!(*out.get_pixel(150, 5), PHOTO);
    }

    #[test]
    fn test_embossed_kicker_is_centered() {
        let data = branding(&["#dc2626", "#111827"]);
        let out = render(Variant::Embossed, "Only today all shoes half price", Some(&data));
        let accent = Rgba([0x11, 0x18, 0x27, 255]);
        let cols: Vec<u32> = (0..300)
            .filter(|&x| (120..240).any(|y| *out.get_pixel(x, y) == accent))
            .collect();
        assert!(!cols.is_empty());
        let min = *cols.first().unwrap() as f32;
        let max = *cols.last().unwrap() as f32;
        assert!(((min + max) / 2.0 - 150.0).abs() <= 2.0);
    }

    #[test]
    fn test_empty_headline_leaves_image() {
        let out = render(Variant::LineHighlight, "", None);
        assert!(out.pixels().all(|p| *p == PHOTO));
    }
}
