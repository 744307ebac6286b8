//! # Bannerkit - Advertising Banner Composition Engine
//!
//! Bannerkit turns a background image, a headline and optional brand data
//! into a finished raster banner. It provides:
//!
//! - **Color science**: dominant color sampling, HSL conversion, harmonic pastel palettes
//! - **Gradients**: linear and two-circle radial fills with canvas semantics
//! - **Typography**: font-size search and word wrapping per template family
//! - **Templates**: standard plaque layouts and three branded variants
//! - **Fallbacks**: placeholder banners when the source image cannot be loaded
//!
//! ## Quick Start
//!
//! ```no_run
//! use bannerkit::{
//!     config::RenderConfig,
//!     output,
//!     request::{BannerRequest, BannerSize},
//!     template::TemplateComposer,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), bannerkit::BannerError> {
//! let composer = TemplateComposer::from_config(&RenderConfig::default())?;
//!
//! let request = BannerRequest::new(
//!     "Get 50% off today",
//!     "https://cdn.example.com/background.png",
//!     BannerSize::new(336, 280)?,
//!     "red_white".parse()?,
//! );
//!
//! // Never fails: unreachable images produce a placeholder
//! let outcome = composer.render(&request).await;
//! let exported = output::export(&request, outcome);
//!
//! if let Some(png) = exported.png() {
//!     std::fs::write("banner.png", png)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`color`] | Dominant color, HSL, palettes, brightness |
//! | [`text`] | Fonts, measurement and headline layout |
//! | [`render`] | Canvas, gradients, cover-fit, fallback placeholders |
//! | [`template`] | Standard and branded layouts, the render state machine |
//! | [`loader`] | Source image loading with deadline and cancellation |
//! | [`request`] | Validated render input and its JSON form |
//! | [`output`] | Render outcomes, PNG export and metadata |
//! | [`config`] | Process-wide settings |
//! | [`error`] | Error types |

pub mod color;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
pub mod request;
pub mod template;
pub mod text;

// Re-exports for convenience
pub use error::BannerError;
pub use output::{RenderOutcome, RenderedBanner};
pub use request::BannerRequest;
pub use template::TemplateComposer;
