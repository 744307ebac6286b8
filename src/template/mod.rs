//! # Templates
//!
//! Banner layouts and the composer that drives them.
//!
//! | Template | Identifier | Layout |
//! |----------|------------|--------|
//! | Standard | `blue_white` | Image on top, blue gradient plaque with uppercase text |
//! | Standard | `red_white` | Image on top, red gradient plaque with uppercase text |
//! | Branded | `branded` | Full-bleed image, text overlay in one of three [`Variant`]s |
//!
//! ## Modules
//!
//! - [`composer`]: the render state machine ([`TemplateComposer`])
//! - [`standard`]: image + bottom plaque layout
//! - [`branded`]: full-bleed layouts with brand colors

pub mod branded;
pub mod composer;
pub mod standard;

pub use composer::TemplateComposer;

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BannerError;

/// Color theme of a standard template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardTheme {
    BlueWhite,
    RedWhite,
}

impl StandardTheme {
    /// Plaque gradient stops, top to bottom.
    pub fn plaque_colors(self) -> (u32, u32) {
        match self {
            StandardTheme::BlueWhite => (0x1e40af, 0x1d4ed8),
            StandardTheme::RedWhite => (0xdc2626, 0xe11d48),
        }
    }

    pub fn text_transform(self) -> TextTransform {
        match self {
            StandardTheme::BlueWhite | StandardTheme::RedWhite => TextTransform::Uppercase,
        }
    }
}

/// Banner template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Standard(StandardTheme),
    Branded,
}

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::Standard(StandardTheme::BlueWhite) => "blue_white",
            Template::Standard(StandardTheme::RedWhite) => "red_white",
            Template::Branded => "branded",
        }
    }

    pub fn is_branded(self) -> bool {
        matches!(self, Template::Branded)
    }
}

impl FromStr for Template {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue_white" => Ok(Template::Standard(StandardTheme::BlueWhite)),
            "red_white" => Ok(Template::Standard(StandardTheme::RedWhite)),
            "branded" => Ok(Template::Branded),
            other => Err(BannerError::InvalidRequest(format!(
                "Unknown template '{}' (expected blue_white, red_white or branded)",
                other
            ))),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Case applied to the headline before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
        }
    }
}

/// Text treatment of the branded template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Colored box behind each line.
    LineHighlight = 1,
    /// White plaque with kicker, headline and subhead.
    StructuredPlaque = 2,
    /// Centered embossed text with a kicker box.
    Embossed = 3,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::LineHighlight,
        Variant::StructuredPlaque,
        Variant::Embossed,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Result<Self, BannerError> {
        match n {
            1 => Ok(Variant::LineHighlight),
            2 => Ok(Variant::StructuredPlaque),
            3 => Ok(Variant::Embossed),
            _ => Err(BannerError::InvalidRequest(format!(
                "Variant must be 1, 2 or 3, got {}",
                n
            ))),
        }
    }

    /// Default variant for the `index`-th banner of a batch, cycling 1, 2, 3.
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Share of the base text width the variant may use.
    pub fn width_factor(self) -> f32 {
        match self {
            Variant::LineHighlight => 1.0,
            Variant::StructuredPlaque => 0.85,
            Variant::Embossed => 0.9,
        }
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

/// Stage of a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    LoadingImage,
    Composing,
    FallbackComposing,
    Done,
}

impl RenderState {
    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: RenderState) -> bool {
        use RenderState::*;
        matches!(
            (self, next),
            (Idle, LoadingImage)
                | (LoadingImage, Composing)
                | (LoadingImage, FallbackComposing)
                | (Composing, FallbackComposing)
                | (Composing, Done)
                | (FallbackComposing, Done)
        )
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderState::Idle => "idle",
            RenderState::LoadingImage => "loading_image",
            RenderState::Composing => "composing",
            RenderState::FallbackComposing => "fallback_composing",
            RenderState::Done => "done",
        };
        f.write_str(name)
    }
}
