//! # Template Composer
//!
//! Drives one render from request to finished pixels.
//!
//! ```text
//! Idle ──► LoadingImage ──ok──► Composing ──────────────► Done
//!               │                   │                      ▲
//!               │ error/timeout/    │ composition error    │
//!               │ cancel            ▼                      │
//!               └──────────► FallbackComposing ────────────┘
//! ```
//!
//! A render never fails. Load failures produce a placeholder
//! ([`RenderOutcome::Fallback`]); composition failures hand the original
//! image URL back ([`RenderOutcome::Original`]).
//!
//! ## Example
//!
//! ```no_run
//! use bannerkit::request::{BannerRequest, BannerSize};
//! use bannerkit::template::TemplateComposer;
//! use bannerkit::config::RenderConfig;
//!
//! # async fn demo() -> Result<(), bannerkit::BannerError> {
//! let composer = TemplateComposer::from_config(&RenderConfig::default())?;
//! let request = BannerRequest::new(
//!     "Get 50% off today",
//!     "https://cdn.example.com/bg.png",
//!     BannerSize::new(336, 280)?,
//!     "red_white".parse()?,
//! );
//! let outcome = composer.render(&request).await;
//! println!("{}", outcome.kind());
//! # Ok(())
//! # }
//! ```

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

use super::{RenderState, Template, Variant, branded, standard};
use crate::config::{DEFAULT_LOAD_TIMEOUT_MS, RenderConfig};
use crate::error::BannerError;
use crate::loader::{CancelToken, ImageLoader, SourceLoader, load_with_deadline};
use crate::output::{RenderOutcome, RenderedBanner};
use crate::render::canvas::SoftwareCanvas;
use crate::render::fallback::{FallbackRenderer, FallbackStyle, fallback_label};
use crate::request::BannerRequest;
use crate::text::FontBook;

/// Tracks the stage of one render and logs each step.
#[derive(Debug)]
struct StateMachine {
    state: RenderState,
}

impl StateMachine {
    fn new() -> Self {
        Self {
            state: RenderState::Idle,
        }
    }

    fn advance(&mut self, next: RenderState) {
        let valid = self.state.can_transition_to(next);
        if !valid {
            tracing::warn!(from = %self.state, to = %next, "Invalid render state transition");
        }
        debug_assert!(valid, "invalid transition {} -> {}", self.state, next);
        tracing::debug!(from = %self.state, to = %next, "Render state");
        self.state = next;
    }
}

/// Renders banners. Cheap to clone; clones share fonts and the loader.
#[derive(Clone)]
pub struct TemplateComposer {
    fonts: Arc<FontBook>,
    loader: Arc<dyn ImageLoader>,
    load_timeout: Duration,
}

impl std::fmt::Debug for TemplateComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateComposer")
            .field("font_families", &self.fonts.family_count())
            .field("load_timeout", &self.load_timeout)
            .finish()
    }
}

impl TemplateComposer {
    pub fn new(fonts: Arc<FontBook>, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            fonts,
            loader,
            load_timeout: Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS),
        }
    }

    /// Load fonts and build an HTTP-capable loader from `config`.
    pub fn from_config(config: &RenderConfig) -> Result<Self, BannerError> {
        let fonts = FontBook::from_entries(&config.fonts)?;
        let loader = SourceLoader::from_config(config)?;
        Ok(Self::new(Arc::new(fonts), Arc::new(loader)).with_load_timeout(config.load_timeout()))
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Render a banner.
    pub async fn render(&self, request: &BannerRequest) -> RenderOutcome {
        self.render_with_cancel(request, None).await
    }

    /// Render a banner, abandoning the image load if `cancel` fires.
    #[tracing::instrument(
        name = "render",
        skip_all,
        fields(
            template = %request.template,
            size = %request.size,
            index = request.banner_index,
        )
    )]
    pub async fn render_with_cancel(
        &self,
        request: &BannerRequest,
        cancel: Option<&CancelToken>,
    ) -> RenderOutcome {
        let mut machine = StateMachine::new();
        let seed = request.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        tracing::debug!(seed, uploaded = request.is_uploaded, "Starting render");

        machine.advance(RenderState::LoadingImage);
        let loaded = load_with_deadline(
            self.loader.as_ref(),
            &request.image_url,
            self.load_timeout,
            cancel,
        )
        .await;

        let outcome = match loaded {
            Ok(image) => {
                machine.advance(RenderState::Composing);
                match self.compose(request, &image, &mut rng) {
                    Ok(banner) => RenderOutcome::Composed(banner),
                    Err(e) => {
                        tracing::warn!(error = %e, "Composition failed, using original image");
                        machine.advance(RenderState::FallbackComposing);
                        RenderOutcome::Original(request.image_url.clone())
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Image load failed, rendering fallback");
                machine.advance(RenderState::FallbackComposing);
                RenderOutcome::Fallback(self.fallback(request, &mut rng))
            }
        };

        machine.advance(RenderState::Done);
        tracing::info!(outcome = outcome.kind(), "Render finished");
        outcome
    }

    /// Compose a banner over an already decoded image.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        request: &BannerRequest,
        image: &RgbaImage,
        rng: &mut R,
    ) -> Result<RenderedBanner, BannerError> {
        let mut canvas = SoftwareCanvas::new(request.size.width, request.size.height);

        match request.template {
            Template::Standard(theme) => standard::compose(
                &mut canvas,
                image,
                &request.headline,
                theme,
                request.is_uploaded,
                &self.fonts,
                rng,
            )?,
            Template::Branded => {
                let variant = request
                    .resolved_variant()
                    .unwrap_or_else(|| Variant::for_index(request.banner_index));
                tracing::debug!(variant = variant.number(), "Branded variant");
                branded::compose(
                    &mut canvas,
                    image,
                    &request.headline,
                    variant,
                    request.branding.as_ref(),
                    request.is_uploaded,
                    &self.fonts,
                    rng,
                )?
            }
        }

        Ok(RenderedBanner::new(canvas.into_image(), false))
    }

    /// Placeholder for a request whose image could not be loaded.
    pub fn fallback<R: Rng + ?Sized>(&self, request: &BannerRequest, rng: &mut R) -> RenderedBanner {
        let style = if request.template.is_branded() || request.source_model.is_some() {
            FallbackStyle::random_preset(rng)
        } else {
            FallbackStyle::Generic
        };
        let label = fallback_label(request.source_model.as_deref());
        tracing::debug!(?style, %label, "Fallback placeholder");

        FallbackRenderer::new(&self.fonts).render(
            request.size.width,
            request.size.height,
            style,
            &label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BannerSize;
    use async_trait::async_trait;
    use image::Rgba;

    /// Loader serving a fixed image, or failing.
    struct Fixed(Option<RgbaImage>);

    #[async_trait]
    impl ImageLoader for Fixed {
        async fn load(&self, source: &str) -> Result<RgbaImage, BannerError> {
            self.0
                .clone()
                .ok_or_else(|| BannerError::ImageLoad(format!("no image at {}", source)))
        }
    }

    fn composer(image: Option<RgbaImage>) -> TemplateComposer {
        TemplateComposer::new(Arc::new(FontBook::bitmap()), Arc::new(Fixed(image)))
    }

    fn request(template: &str) -> BannerRequest {
        BannerRequest::new(
            "Sale today",
            "https://cdn.example.com/bg.png",
            BannerSize::new(300, 250).unwrap(),
            template.parse().unwrap(),
        )
        .with_seed(11)
    }

    #[test]
    fn test_state_machine_walks_happy_path() {
        let mut machine = StateMachine::new();
        machine.advance(RenderState::LoadingImage);
        machine.advance(RenderState::Composing);
        machine.advance(RenderState::Done);
        assert_eq!(machine.state, RenderState::Done);
    }

    #[tokio::test]
    async fn test_render_composed() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let outcome = composer(Some(image)).render(&request("blue_white")).await;
        assert!(matches!(outcome, RenderOutcome::Composed(_)));
        let banner = outcome.banner().unwrap();
        assert_eq!((banner.width, banner.height), (300, 250));
        assert!(!banner.is_fallback);
    }

    #[tokio::test]
    async fn test_load_failure_renders_generic_fallback() {
        let outcome = composer(None).render(&request("red_white")).await;
        assert!(outcome.is_fallback());
        let banner = outcome.banner().unwrap();
        assert!(banner.is_fallback);
        assert_eq!(*banner.image.get_pixel(0, 0), Rgba([0x6b, 0x72, 0x80, 255]));
    }

    #[tokio::test]
    async fn test_branded_fallback_uses_preset() {
        let outcome = composer(None).render(&request("branded")).await;
        let banner = outcome.banner().unwrap();
        assert_ne!(*banner.image.get_pixel(0, 0), Rgba([0x6b, 0x72, 0x80, 255]));
    }

    #[tokio::test]
    async fn test_empty_image_returns_original_url() {
        let outcome = composer(Some(RgbaImage::new(0, 0)))
            .render(&request("branded"))
            .await;
        match outcome {
            RenderOutcome::Original(url) => assert_eq!(url, "https://cdn.example.com/bg.png"),
            other => panic!("expected original, got {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_load() {
        let token = CancelToken::new();
        token.cancel();
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        let outcome = composer(Some(image))
            .render_with_cancel(&request("blue_white"), Some(&token))
            .await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_uploaded_render_is_reproducible_with_seed() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        let c = composer(Some(image));
        let base = request("blue_white").uploaded(true);

        let a = c.render(&base.clone().with_seed(1)).await.into_banner().unwrap();
        let b = c.render(&base.clone().with_seed(1)).await.into_banner().unwrap();
        assert_eq!(a.image, b.image);
    }
}
