//! # Render Output
//!
//! What a render hands back to the caller.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`RenderedBanner`] | Finished pixels, owned by the caller |
//! | [`RenderOutcome`] | Composed banner, fallback placeholder, or the original image URL |
//! | [`BannerOutput`] | PNG bytes (or URL) plus [`BannerMetadata`] for history storage |

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;

use crate::error::BannerError;
use crate::render::canvas::encode_png;
use crate::request::{BannerRequest, BannerSize};
use crate::template::{Template, Variant};

/// A finished banner bitmap.
#[derive(Debug, Clone)]
pub struct RenderedBanner {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
    pub is_fallback: bool,
}

impl RenderedBanner {
    pub fn new(image: RgbaImage, is_fallback: bool) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            width,
            height,
            is_fallback,
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, BannerError> {
        encode_png(&self.image)
    }
}

/// Result of a render. Rendering itself never fails; the variants say how
/// far it got.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// The template was composed over the source image.
    Composed(RenderedBanner),
    /// The source image could not be loaded; a placeholder was drawn.
    Fallback(RenderedBanner),
    /// Composition failed; the caller should use the source image as is.
    Original(String),
}

impl RenderOutcome {
    pub fn banner(&self) -> Option<&RenderedBanner> {
        match self {
            RenderOutcome::Composed(banner) | RenderOutcome::Fallback(banner) => Some(banner),
            RenderOutcome::Original(_) => None,
        }
    }

    pub fn into_banner(self) -> Option<RenderedBanner> {
        match self {
            RenderOutcome::Composed(banner) | RenderOutcome::Fallback(banner) => Some(banner),
            RenderOutcome::Original(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderOutcome::Fallback(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderOutcome::Composed(_) => "composed",
            RenderOutcome::Fallback(_) => "fallback",
            RenderOutcome::Original(_) => "original",
        }
    }
}

/// Metadata echoed alongside every exported banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerMetadata {
    pub headline: String,
    pub size: BannerSize,
    pub template: Template,
    pub is_uploaded_image: bool,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    /// Set when the banner could not be composed and the source image
    /// stands in for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Exported banner content.
#[derive(Debug, Clone, PartialEq)]
pub enum BannerArtifact {
    Png(Vec<u8>),
    OriginalUrl(String),
}

/// A render ready to hand to storage.
#[derive(Debug, Clone)]
pub struct BannerOutput {
    pub artifact: BannerArtifact,
    pub metadata: BannerMetadata,
}

impl BannerOutput {
    pub fn png(&self) -> Option<&[u8]> {
        match &self.artifact {
            BannerArtifact::Png(bytes) => Some(bytes),
            BannerArtifact::OriginalUrl(_) => None,
        }
    }
}

/// Encode an outcome and attach its metadata.
///
/// Never fails: a banner that cannot be encoded degrades to the original
/// image URL, the same as a composition failure.
pub fn export(request: &BannerRequest, outcome: RenderOutcome) -> BannerOutput {
    let is_fallback = outcome.is_fallback();

    let artifact = match outcome {
        RenderOutcome::Composed(banner) | RenderOutcome::Fallback(banner) => {
            match banner.to_png() {
                Ok(bytes) => BannerArtifact::Png(bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "PNG export failed, using original image");
                    BannerArtifact::OriginalUrl(request.image_url.clone())
                }
            }
        }
        RenderOutcome::Original(url) => BannerArtifact::OriginalUrl(url),
    };

    let original_url = match &artifact {
        BannerArtifact::OriginalUrl(url) => Some(url.clone()),
        BannerArtifact::Png(_) => None,
    };

    BannerOutput {
        artifact,
        metadata: BannerMetadata {
            headline: request.headline.clone(),
            size: request.size,
            template: request.template,
            is_uploaded_image: request.is_uploaded,
            is_fallback,
            variant: request.resolved_variant(),
            original_url,
            created_at: Utc::now(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn request(template: Template) -> BannerRequest {
        BannerRequest::new(
            "Summer Sale",
            "https://cdn.example.com/bg.png",
            BannerSize::new(4, 2).unwrap(),
            template,
        )
    }

    #[test]
    fn test_rendered_banner_dimensions() {
        let banner = RenderedBanner::new(RgbaImage::new(7, 3), false);
        assert_eq!((banner.width, banner.height), (7, 3));
    }

    #[test]
    fn test_export_composed() {
        let banner = RenderedBanner::new(RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255])), false);
        let out = export(&request(Template::Branded), RenderOutcome::Composed(banner));

        let png = out.png().unwrap();
        let decoded = image::load_from_memory(png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([1, 2, 3, 255]));

        assert!(!out.metadata.is_fallback);
        assert_eq!(out.metadata.variant, Some(Variant::LineHighlight));
        assert_eq!(out.metadata.original_url, None);
    }

    #[test]
    fn test_export_original_url() {
        let req = request("red_white".parse().unwrap());
        let out = export(&req, RenderOutcome::Original(req.image_url.clone()));
        assert_eq!(
            out.artifact,
            BannerArtifact::OriginalUrl("https://cdn.example.com/bg.png".into())
        );
        assert_eq!(out.png(), None);
        assert_eq!(out.metadata.variant, None);
    }

    #[test]
    fn test_metadata_json_shape() {
        let banner = RenderedBanner::new(RgbaImage::new(4, 2), true);
        let out = export(&request("blue_white".parse().unwrap()), RenderOutcome::Fallback(banner));
        let json = serde_json::to_value(&out.metadata).unwrap();

        assert_eq!(json["headline"], "Summer Sale");
        assert_eq!(json["size"], "4x2");
        assert_eq!(json["template"], "blue_white");
        assert_eq!(json["isUploadedImage"], false);
        assert_eq!(json["isFallback"], true);
        assert!(json.get("variant").is_none());
        assert!(json["createdAt"].is_string());
    }
}
