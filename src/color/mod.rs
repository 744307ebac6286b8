//! # Color Analysis
//!
//! Color science used by the composer:
//!
//! - [`dominant_color`]: sampled average of the opaque pixels of a bitmap
//! - [`rgb_to_hsl`] / [`hsl_to_rgb`]: conversions between RGB and HSL
//! - [`parse_css_color`]: brand color strings (`#hex`, `rgb()`, `hsl()`, names)
//! - [`palette`]: harmonic pastel palettes derived from a dominant hue
//! - [`brightness`]: mean luma over a region of a canvas
//!
//! ## Example
//!
//! ```
//! use bannerkit::color::{rgb_to_hsl, Rgb};
//!
//! let hsl = rgb_to_hsl(Rgb::new(255, 0, 0));
//! assert_eq!(hsl.h, 0.0);
//! assert_eq!(hsl.s, 100.0);
//! assert_eq!(hsl.l, 50.0);
//! ```

pub mod brightness;
pub mod palette;

use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` literal. Only used for the fixed template colors.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Same color with an alpha in [0.0, 1.0], as in CSS `rgba()`.
    pub fn with_alpha(self, alpha: f32) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
    }
}

/// HSL color: hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s,
            l,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Average color of the fully opaque pixels of `image`.
///
/// Pixels are visited at a stride of
/// `max(1, floor(total_bytes / (width * height / 100)))` so large uploads
/// cost the same as small ones. Pixels with any transparency are skipped
/// (uploads are usually cut-outs with transparent margins). A fully
/// transparent image yields white.
pub fn dominant_color(image: &RgbaImage) -> Rgb {
    let pixel_count = image.width() as usize * image.height() as usize;
    if pixel_count == 0 {
        return Rgb::WHITE;
    }

    let total_bytes = pixel_count * 4;
    let stride = ((total_bytes as f64 / (pixel_count as f64 / 100.0)).floor() as usize).max(1);

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    let mut count = 0u64;

    // Stride is in bytes; sample the pixel each step lands in
    let raw = image.as_raw();
    for offset in (0..total_bytes).step_by(stride) {
        let start = offset - offset % 4;
        let pixel = &raw[start..start + 4];
        if pixel[3] < 255 {
            continue;
        }
        r += pixel[0] as u64;
        g += pixel[1] as u64;
        b += pixel[2] as u64;
        count += 1;
    }

    if count == 0 {
        return Rgb::WHITE;
    }

    Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
}

/// Standard RGB → HSL conversion.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0 * 360.0, s * 100.0, l * 100.0)
}

/// Standard HSL → RGB conversion.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f32| -> u8 {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

/// Parse a CSS color string into RGBA. Returns `None` for anything
/// unparseable so callers can substitute their default.
pub fn parse_css_color(input: &str) -> Option<Rgba<u8>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    csscolorparser::parse(trimmed)
        .ok()
        .map(|color| Rgba(color.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_color_of_solid_image() {
        let img = RgbaImage::from_pixel(40, 30, Rgba([10, 120, 200, 255]));
        assert_eq!(dominant_color(&img), Rgb::new(10, 120, 200));
    }

    #[test]
    fn test_dominant_color_single_pixel() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        assert_eq!(dominant_color(&img), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_dominant_color_transparent_is_white() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        assert_eq!(dominant_color(&img), Rgb::WHITE);
    }

    #[test]
    fn test_dominant_color_skips_translucent_pixels() {
        // Alpha 254 counts as transparent
        let img = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 254]));
        assert_eq!(dominant_color(&img), Rgb::WHITE);
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = rgb_to_hsl(Rgb::new(255, 0, 0));
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));

        let green = rgb_to_hsl(Rgb::new(0, 255, 0));
        assert!((green.h - 120.0).abs() < 1e-3);

        let blue = rgb_to_hsl(Rgb::new(0, 0, 255));
        assert!((blue.h - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_rgb_to_hsl_grey_has_no_hue() {
        let grey = rgb_to_hsl(Rgb::new(128, 128, 128));
        assert_eq!(grey.h, 0.0);
        assert_eq!(grey.s, 0.0);
        assert!((grey.l - 50.196).abs() < 0.01);
    }

    #[test]
    fn test_hsl_round_trip_is_close() {
        for rgb in [
            Rgb::new(220, 38, 38),
            Rgb::new(30, 64, 175),
            Rgb::new(243, 244, 246),
        ] {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            assert!((back.r as i32 - rgb.r as i32).abs() <= 1);
            assert!((back.g as i32 - rgb.g as i32).abs() <= 1);
            assert!((back.b as i32 - rgb.b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_hsl_display_is_css() {
        assert_eq!(Hsl::new(210.0, 65.0, 90.0).to_string(), "hsl(210, 65%, 90%)");
        // Hue wraps
        assert_eq!(Hsl::new(390.0, 60.0, 92.0).h, 30.0);
        assert_eq!(Hsl::new(-30.0, 60.0, 92.0).h, 330.0);
    }

    #[test]
    fn test_parse_css_color() {
        assert_eq!(parse_css_color("#dc2626"), Some(Rgba([220, 38, 38, 255])));
        let translucent = parse_css_color("rgba(220, 20, 20, 0.5)").map(|c| c[3]);
        assert!(matches!(translucent, Some(127..=128)));
        assert_eq!(parse_css_color("white"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_css_color(""), None);
        assert_eq!(parse_css_color("not a color"), None);
    }
}
