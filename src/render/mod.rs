//! # Rendering Module
//!
//! Pixel-level building blocks shared by every template.
//!
//! ## Modules
//!
//! - [`canvas`]: the [`Rasterizer`](canvas::Rasterizer) trait and its software implementation
//! - [`gradient`]: linear and radial two-stop gradients, backdrop styles
//! - [`compositor`]: cover-fit placement of the source image
//! - [`fallback`]: placeholder banners for unloadable sources
//!
//! ## Usage Example
//!
//! ```
//! use bannerkit::render::canvas::{Paint, Rasterizer, Rect, SoftwareCanvas};
//! use bannerkit::render::gradient::GradientStyle;
//! use image::Rgba;
//!
//! let mut canvas = SoftwareCanvas::new(300, 250);
//! let backdrop = GradientStyle::Diagonal.build(
//!     300.0,
//!     250.0,
//!     Rgba([230, 240, 255, 255]),
//!     Rgba([255, 230, 240, 255]),
//! );
//! canvas.fill_rect(Rect::new(0.0, 0.0, 300.0, 250.0), &Paint::Gradient(backdrop));
//!
//! let png = canvas.encode_png().unwrap();
//! assert!(!png.is_empty());
//! ```

pub mod canvas;
pub mod compositor;
pub mod fallback;
pub mod gradient;
