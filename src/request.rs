//! # Banner Requests
//!
//! [`BannerRequest`] is the validated, immutable input to one render.
//! [`BannerSpec`] is its camelCase JSON form as produced by the surrounding
//! web application; converting a spec into a request validates it.
//!
//! ```json
//! {
//!   "headline": "Get 50% off today",
//!   "imageUrl": "https://cdn.example.com/bg.png",
//!   "size": "336x280",
//!   "template": "red_white",
//!   "isUploadedImage": false
//! }
//! ```

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BannerError;
use crate::template::{Template, Variant};

/// Longest headline accepted, in characters.
pub const MAX_HEADLINE_CHARS: usize = 100;

/// Largest accepted banner edge, in pixels.
pub const MAX_DIMENSION: u32 = 4096;

/// Pixel dimensions of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerSize {
    pub width: u32,
    pub height: u32,
}

impl BannerSize {
    pub fn new(width: u32, height: u32) -> Result<Self, BannerError> {
        if width == 0 || height == 0 {
            return Err(BannerError::InvalidRequest(format!(
                "Banner size must be non-zero, got {}x{}",
                width, height
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BannerError::InvalidRequest(format!(
                "Banner size {}x{} exceeds {}px",
                width, height, MAX_DIMENSION
            )));
        }
        Ok(Self { width, height })
    }
}

impl FromStr for BannerSize {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BannerError::InvalidRequest(format!("Invalid size '{}' (expected WxH)", s));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(width, height)
    }
}

impl fmt::Display for BannerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for BannerSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Brand information extracted from the advertiser's landing page.
///
/// Only the first one or two colors and the first font are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingData {
    pub title: String,
    pub industry: String,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
}

impl BrandingData {
    pub fn primary_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    pub fn secondary_color(&self) -> Option<&str> {
        self.colors.get(1).map(String::as_str)
    }

    pub fn font_family(&self) -> Option<&str> {
        self.fonts.first().map(String::as_str)
    }
}

/// Input to one render.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerRequest {
    pub headline: String,
    /// `data:` URL, `http(s)://` URL, `file://` URL or filesystem path.
    pub image_url: String,
    pub size: BannerSize,
    pub template: Template,
    /// Branded variant; `None` cycles by `banner_index`.
    pub variant: Option<Variant>,
    pub branding: Option<BrandingData>,
    /// Background was uploaded by the user rather than generated.
    pub is_uploaded: bool,
    /// Position of this banner within a batch.
    pub banner_index: usize,
    /// Seed for palette and gradient choices. Fresh entropy when `None`.
    pub seed: Option<u64>,
    /// Model that generated the background, shown on the fallback.
    pub source_model: Option<String>,
}

impl BannerRequest {
    pub fn new(
        headline: impl Into<String>,
        image_url: impl Into<String>,
        size: BannerSize,
        template: Template,
    ) -> Self {
        Self {
            headline: headline.into(),
            image_url: image_url.into(),
            size,
            template,
            variant: None,
            branding: None,
            is_uploaded: false,
            banner_index: 0,
            seed: None,
            source_model: None,
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_branding(mut self, branding: BrandingData) -> Self {
        self.branding = Some(branding);
        self
    }

    pub fn uploaded(mut self, is_uploaded: bool) -> Self {
        self.is_uploaded = is_uploaded;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.banner_index = index;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_source_model(mut self, model: impl Into<String>) -> Self {
        self.source_model = Some(model.into());
        self
    }

    /// Variant actually used: only branded banners have one.
    pub fn resolved_variant(&self) -> Option<Variant> {
        match self.template {
            Template::Branded => Some(
                self.variant
                    .unwrap_or_else(|| Variant::for_index(self.banner_index)),
            ),
            Template::Standard(_) => None,
        }
    }

    /// Check the headline and image reference.
    pub fn validate(&self) -> Result<(), BannerError> {
        let headline = self.headline.trim();
        if headline.is_empty() {
            return Err(BannerError::InvalidRequest("Headline is empty".into()));
        }
        let chars = headline.chars().count();
        if chars > MAX_HEADLINE_CHARS {
            return Err(BannerError::InvalidRequest(format!(
                "Headline is {} characters, maximum is {}",
                chars, MAX_HEADLINE_CHARS
            )));
        }
        if self.image_url.trim().is_empty() {
            return Err(BannerError::InvalidRequest("Image URL is empty".into()));
        }
        Ok(())
    }
}

/// JSON input contract for one banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerSpec {
    pub headline: String,
    pub image_url: String,
    pub size: String,
    pub template: String,
    #[serde(default)]
    pub branding_data: Option<BrandingData>,
    #[serde(default)]
    pub selected_variant: Option<u8>,
    #[serde(default)]
    pub is_uploaded_image: bool,
    #[serde(default)]
    pub banner_index: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub source_model: Option<String>,
}

impl TryFrom<BannerSpec> for BannerRequest {
    type Error = BannerError;

    fn try_from(spec: BannerSpec) -> Result<Self, Self::Error> {
        let size: BannerSize = spec.size.parse()?;
        let template: Template = spec.template.parse()?;
        let variant = spec.selected_variant.map(Variant::from_number).transpose()?;

        let request = BannerRequest {
            headline: spec.headline.trim().to_string(),
            image_url: spec.image_url.trim().to_string(),
            size,
            template,
            variant,
            branding: spec.branding_data,
            is_uploaded: spec.is_uploaded_image,
            banner_index: spec.banner_index.unwrap_or(0),
            seed: spec.seed,
            source_model: spec.source_model.filter(|m| !m.trim().is_empty()),
        };
        request.validate()?;
        Ok(request)
    }
}
