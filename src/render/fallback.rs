//! Placeholder banners for sources that could not be loaded.
//!
//! A diagonal two-stop gradient at the requested size with a centered,
//! semi-transparent label. Drawing never fails.
//!
//! | Style | Gradient | Used for |
//! |-------|----------|----------|
//! | [`FallbackStyle::Generic`] | `#6b7280 → #374151` | standard templates |
//! | [`FallbackStyle::Preset`] | one of [`PRESET_GRADIENTS`] | branded or model-sourced banners |

use image::Rgba;
use rand::Rng;

use super::canvas::{Paint, Rasterizer, Rect, SoftwareCanvas, TextStyle};
use super::gradient::GradientStyle;
use crate::color::Rgb;
use crate::output::RenderedBanner;
use crate::text::font::BOLD;
use crate::text::{FontBook, TextAlign, TextBaseline, shrink_to_width};

/// Label shown when no source model is known.
pub const UNAVAILABLE_LABEL: &str = "Изображение недоступно";

pub const GENERIC_GRADIENT: (Rgb, Rgb) = (Rgb::from_hex(0x6b7280), Rgb::from_hex(0x374151));

pub const PRESET_GRADIENTS: [(Rgb, Rgb); 5] = [
    (Rgb::from_hex(0x667eea), Rgb::from_hex(0x764ba2)),
    (Rgb::from_hex(0xf093fb), Rgb::from_hex(0xf5576c)),
    (Rgb::from_hex(0x4facfe), Rgb::from_hex(0x00f2fe)),
    (Rgb::from_hex(0x43e97b), Rgb::from_hex(0x38f9d7)),
    (Rgb::from_hex(0xfa709a), Rgb::from_hex(0xfee140)),
];

const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 204]);
const LABEL_WIDTH_RATIO: f32 = 0.9;
const LABEL_MIN_SIZE: f32 = 8.0;

/// Gradient used by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStyle {
    Generic,
    /// Index into [`PRESET_GRADIENTS`].
    Preset(usize),
}

impl FallbackStyle {
    pub fn random_preset<R: Rng + ?Sized>(rng: &mut R) -> Self {
        FallbackStyle::Preset(rng.random_range(0..PRESET_GRADIENTS.len()))
    }

    pub fn colors(self) -> (Rgb, Rgb) {
        match self {
            FallbackStyle::Generic => GENERIC_GRADIENT,
            FallbackStyle::Preset(i) => PRESET_GRADIENTS[i % PRESET_GRADIENTS.len()],
        }
    }
}

/// Label for a placeholder: `"<MODEL> Fallback"` when the source model is
/// known, the generic unavailable notice otherwise.
pub fn fallback_label(source_model: Option<&str>) -> String {
    match source_model.map(str::trim).filter(|m| !m.is_empty()) {
        Some(model) => format!("{} Fallback", model.to_uppercase()),
        None => UNAVAILABLE_LABEL.to_string(),
    }
}

/// Draws placeholder banners.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRenderer<'a> {
    fonts: &'a FontBook,
}

impl<'a> FallbackRenderer<'a> {
    pub fn new(fonts: &'a FontBook) -> Self {
        Self { fonts }
    }

    pub fn render(&self, width: u32, height: u32, style: FallbackStyle, label: &str) -> RenderedBanner {
        let mut canvas = SoftwareCanvas::new(width, height);
        self.draw(&mut canvas, style, label);
        RenderedBanner::new(canvas.into_image(), true)
    }

    pub fn draw(&self, canvas: &mut dyn Rasterizer, style: FallbackStyle, label: &str) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let (c1, c2) = style.colors();
        let gradient = GradientStyle::Diagonal.build(w, h, c1.to_rgba(), c2.to_rgba());
        canvas.fill_rect(Rect::new(0.0, 0.0, w, h), &Paint::Gradient(gradient));

        if label.is_empty() {
            return;
        }
        let size = (w.min(h) / 10.0).clamp(10.0, 48.0);
        let font = self.fonts.spec(None, size, BOLD);
        let font = shrink_to_width(&*canvas, label, &font, w * LABEL_WIDTH_RATIO, LABEL_MIN_SIZE);

        let style = TextStyle::new(font, LABEL_COLOR)
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        canvas.fill_text(label, w / 2.0, h / 2.0, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fallback_label() {
        assert_eq!(fallback_label(None), UNAVAILABLE_LABEL);
        assert_eq!(fallback_label(Some("  ")), UNAVAILABLE_LABEL);
        assert_eq!(fallback_label(Some("flux-pro")), "FLUX-PRO Fallback");
    }

    #[test]
    fn test_generic_fallback_corners() {
        let fonts = FontBook::bitmap();
        let banner = FallbackRenderer::new(&fonts).render(300, 250, FallbackStyle::Generic, "");
        assert!(banner.is_fallback);
        assert_eq!((banner.width, banner.height), (300, 250));
        // Diagonal from top-left to bottom-right
        assert_eq!(*banner.image.get_pixel(0, 0), Rgba([0x6b, 0x72, 0x80, 255]));
        let end = banner.image.get_pixel(299, 249);
        assert!((end[0] as i32 - 0x37).abs() <= 2);
        assert!((end[2] as i32 - 0x51).abs() <= 2);
    }

    #[test]
    fn test_fallback_is_fully_opaque() {
        let fonts = FontBook::bitmap();
        let banner = FallbackRenderer::new(&fonts).render(
            120,
            60,
            FallbackStyle::Preset(2),
            UNAVAILABLE_LABEL,
        );
        assert!(banner.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_label_is_drawn_in_the_middle() {
        let fonts = FontBook::bitmap();
        let plain = FallbackRenderer::new(&fonts).render(300, 250, FallbackStyle::Generic, "");
        let labeled =
            FallbackRenderer::new(&fonts).render(300, 250, FallbackStyle::Generic, "GPT Fallback");
        let changed = (0..300).any(|x| plain.image.get_pixel(x, 125) != labeled.image.get_pixel(x, 125));
        assert!(changed);
        // Edges untouched by the label
        assert_eq!(plain.image.get_pixel(2, 2), labeled.image.get_pixel(2, 2));
    }

    #[test]
    fn test_random_preset_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            match FallbackStyle::random_preset(&mut rng) {
                FallbackStyle::Preset(i) => assert!(i < PRESET_GRADIENTS.len()),
                FallbackStyle::Generic => panic!("expected preset"),
            }
        }
    }
}
