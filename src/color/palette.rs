//! Harmonic pastel palettes for gradient backdrops.
//!
//! Each render of an uploaded image picks one of five hue harmonies at
//! random, so regenerating a banner gives a different backdrop for the
//! same upload.

use rand::Rng;
use serde::Serialize;

use super::{Hsl, Rgb, rgb_to_hsl};

/// Fixed hue-offset relationships between the two palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Harmony {
    Complementary,
    Triadic,
    Analogous,
    SplitComplementary,
    Tetradic,
}

impl Harmony {
    pub const ALL: [Harmony; 5] = [
        Harmony::Complementary,
        Harmony::Triadic,
        Harmony::Analogous,
        Harmony::SplitComplementary,
        Harmony::Tetradic,
    ];

    /// Hue offsets (color1, color2) in degrees relative to the dominant hue.
    pub fn hue_offsets(self) -> (f32, f32) {
        match self {
            Harmony::Complementary => (0.0, 180.0),
            Harmony::Triadic => (0.0, 120.0),
            Harmony::Analogous => (30.0, -30.0),
            Harmony::SplitComplementary => (0.0, 150.0),
            Harmony::Tetradic => (0.0, 90.0),
        }
    }

    /// Saturation and lightness (percent) shared by both colors.
    pub fn saturation_lightness(self) -> (f32, f32) {
        match self {
            Harmony::Complementary => (65.0, 90.0),
            Harmony::Triadic => (70.0, 88.0),
            Harmony::Analogous => (60.0, 92.0),
            Harmony::SplitComplementary => (55.0, 90.0),
            Harmony::Tetradic => (60.0, 89.0),
        }
    }

    /// Build the two palette colors around hue `h`.
    pub fn colors(self, h: f32) -> (Hsl, Hsl) {
        let (o1, o2) = self.hue_offsets();
        let (s, l) = self.saturation_lightness();
        (Hsl::new(h + o1, s, l), Hsl::new(h + o2, s, l))
    }
}

/// A two-color gradient palette derived from a dominant color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorPalette {
    pub dominant: Rgb,
    pub color1: Hsl,
    pub color2: Hsl,
    pub harmony: Harmony,
}

/// Pick a harmony uniformly at random and derive two pastel colors from the
/// hue of `dominant`.
pub fn generate_gradient_palette<R: Rng + ?Sized>(dominant: Rgb, rng: &mut R) -> ColorPalette {
    let h = rgb_to_hsl(dominant).h;
    let harmony = Harmony::ALL[rng.random_range(0..Harmony::ALL.len())];
    let (color1, color2) = harmony.colors(h);

    ColorPalette {
        dominant,
        color1,
        color2,
        harmony,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Circular distance between two hues, in degrees.
    fn hue_gap(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_palette_matches_harmony_table() {
        let dominants = [
            Rgb::new(255, 0, 0),
            Rgb::new(30, 64, 175),
            Rgb::new(12, 200, 90),
            Rgb::new(128, 128, 128),
            Rgb::new(250, 240, 10),
        ];

        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for dominant in dominants {
                let palette = generate_gradient_palette(dominant, &mut rng);
                let h = rgb_to_hsl(dominant).h;
                let (o1, o2) = palette.harmony.hue_offsets();
                let (s, l) = palette.harmony.saturation_lightness();

                assert!(hue_gap(palette.color1.h, h + o1) < 1e-3);
                assert!(hue_gap(palette.color2.h, h + o2) < 1e-3);
                assert_eq!(palette.color1.s, s);
                assert_eq!(palette.color2.l, l);
                assert!((55.0..=70.0).contains(&palette.color1.s));
                assert!((88.0..=92.0).contains(&palette.color1.l));
                assert!((0.0..360.0).contains(&palette.color2.h));
            }
        }
    }

    #[test]
    fn test_analogous_wraps_below_zero() {
        let (c1, c2) = Harmony::Analogous.colors(10.0);
        assert_eq!(c1.h, 40.0);
        assert_eq!(c2.h, 340.0);
    }

    #[test]
    fn test_complementary_wraps_above_360() {
        let (c1, c2) = Harmony::Complementary.colors(270.0);
        assert_eq!(c1.h, 270.0);
        assert_eq!(c2.h, 90.0);
    }

    #[test]
    fn test_same_seed_same_palette() {
        let dominant = Rgb::new(200, 50, 90);
        let a = generate_gradient_palette(dominant, &mut StdRng::seed_from_u64(7));
        let b = generate_gradient_palette(dominant, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_harmonies_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(generate_gradient_palette(Rgb::new(1, 2, 3), &mut rng).harmony);
        }
        assert_eq!(seen.len(), Harmony::ALL.len());
    }
}
