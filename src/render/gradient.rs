//! Two-stop gradient fills.
//!
//! Gradients follow HTML canvas semantics: linear gradients project each
//! point onto the start→end axis, radial gradients interpolate between two
//! circles, and `t` is padded to [0, 1] outside the defined range.
//!
//! [`GradientStyle`] holds the five backdrop geometries used behind uploaded
//! images; one is picked at random per render.

use image::Rgba;
use rand::Rng;
use serde::Serialize;

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate two colors channel by channel (alpha included).
pub fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |i: usize| lerp(a[i] as f32, b[i] as f32, t).round().clamp(0.0, 255.0) as u8;
    Rgba([mix(0), mix(1), mix(2), mix(3)])
}

/// Gradient geometry in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    Linear {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Radial {
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
    },
}

/// A two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub start: Rgba<u8>,
    pub end: Rgba<u8>,
}

impl Gradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32, start: Rgba<u8>, end: Rgba<u8>) -> Self {
        Self {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            start,
            end,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn radial(
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        start: Rgba<u8>,
        end: Rgba<u8>,
    ) -> Self {
        Self {
            shape: GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            },
            start,
            end,
        }
    }

    /// Gradient parameter at a point, or `None` where the gradient paints
    /// nothing (degenerate axis, or outside every radial circle).
    pub fn t_at(&self, x: f32, y: f32) -> Option<f32> {
        let t = match self.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => {
                let dx = x1 - x0;
                let dy = y1 - y0;
                let len_sq = dx * dx + dy * dy;
                if len_sq <= f32::EPSILON {
                    return None;
                }
                ((x - x0) * dx + (y - y0) * dy) / len_sq
            }
            GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            } => radial_t(x - x0, y - y0, x1 - x0, y1 - y0, r0, r1 - r0)?,
        };
        Some(t.clamp(0.0, 1.0))
    }

    /// Color at a point (pixel centers are at `+0.5`).
    pub fn color_at(&self, x: f32, y: f32) -> Option<Rgba<u8>> {
        self.t_at(x, y).map(|t| lerp_color(self.start, self.end, t))
    }
}

/// Solve for the largest `t` whose circle `c0 + t·cd`, radius `r0 + t·dr`
/// passes through the point `pd` (relative to `c0`).
fn radial_t(pdx: f32, pdy: f32, cdx: f32, cdy: f32, r0: f32, dr: f32) -> Option<f32> {
    let a = cdx * cdx + cdy * cdy - dr * dr;
    let b = pdx * cdx + pdy * cdy + r0 * dr;
    let c = pdx * pdx + pdy * pdy - r0 * r0;

    if a.abs() < 1e-6 {
        if b.abs() < 1e-6 {
            return None;
        }
        let t = c / (2.0 * b);
        return (r0 + t * dr >= 0.0).then_some(t);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (t1, t2) = ((b + sq) / a, (b - sq) / a);
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };

    if r0 + hi * dr >= 0.0 {
        Some(hi)
    } else if r0 + lo * dr >= 0.0 {
        Some(lo)
    } else {
        None
    }
}

/// Backdrop geometries for uploaded-image banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientStyle {
    /// Top-left corner to bottom-right corner.
    Diagonal,
    /// Left edge to right edge.
    Horizontal,
    /// Top edge to bottom edge.
    Vertical,
    /// Outward from the center, radius `max(w, h) / 2`.
    RadialCenter,
    /// From the top-left corner towards a circle around the bottom-right
    /// corner with radius `max(w, h)`.
    RadialCorner,
}

impl GradientStyle {
    pub const ALL: [GradientStyle; 5] = [
        GradientStyle::Diagonal,
        GradientStyle::Horizontal,
        GradientStyle::Vertical,
        GradientStyle::RadialCenter,
        GradientStyle::RadialCorner,
    ];

    /// Pick one style uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Build the gradient for a `width × height` area anchored at the origin.
    pub fn build(self, width: f32, height: f32, color1: Rgba<u8>, color2: Rgba<u8>) -> Gradient {
        let (w, h) = (width, height);
        match self {
            GradientStyle::Diagonal => Gradient::linear(0.0, 0.0, w, h, color1, color2),
            GradientStyle::Horizontal => Gradient::linear(0.0, 0.0, w, 0.0, color1, color2),
            GradientStyle::Vertical => Gradient::linear(0.0, 0.0, 0.0, h, color1, color2),
            GradientStyle::RadialCenter => Gradient::radial(
                w / 2.0,
                h / 2.0,
                0.0,
                w / 2.0,
                h / 2.0,
                w.max(h) / 2.0,
                color1,
                color2,
            ),
            GradientStyle::RadialCorner => {
                Gradient::radial(0.0, 0.0, 0.0, w, h, w.max(h), color1, color2)
            }
        }
    }
}
