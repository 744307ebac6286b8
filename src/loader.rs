//! # Image Loading
//!
//! Fetches and decodes the source bitmap of a banner.
//!
//! | Source | Example | Transport |
//! |--------|---------|-----------|
//! | Data URL | `data:image/png;base64,iVBOR...` | decoded in memory |
//! | HTTP(S) | `https://cdn.example.com/bg.png` | `reqwest` |
//! | File URL | `file:///tmp/bg.png` | `tokio::fs` |
//! | Path | `uploads/bg.jpg` | `tokio::fs` |
//!
//! [`load_with_deadline`] bounds a load by a timeout and an optional
//! [`CancelToken`]. Both surface as errors that the composer routes to the
//! fallback renderer.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::RenderConfig;
use crate::error::BannerError;

/// Source of decoded bitmaps.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetch and decode the image at `source`.
    async fn load(&self, source: &str) -> Result<RgbaImage, BannerError>;
}

/// Loads data URLs, HTTP(S) URLs and local files.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: reqwest::Client,
}

impl SourceLoader {
    pub fn new(user_agent: &str) -> Result<Self, BannerError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| BannerError::ImageLoad(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self, BannerError> {
        Self::new(&config.user_agent)
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, BannerError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BannerError::ImageLoad(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(BannerError::ImageLoad(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BannerError::ImageLoad(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_file(&self, path: &str) -> Result<Vec<u8>, BannerError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| BannerError::ImageLoad(format!("Failed to read {}: {}", path, e)))
    }
}

#[async_trait]
impl ImageLoader for SourceLoader {
    async fn load(&self, source: &str) -> Result<RgbaImage, BannerError> {
        let source = source.trim();
        let bytes = if source.starts_with("data:") {
            decode_data_url(source)?
        } else if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch_http(source).await?
        } else if let Some(path) = source.strip_prefix("file://") {
            self.fetch_file(path).await?
        } else {
            self.fetch_file(source).await?
        };

        let image = image::load_from_memory(&bytes)
            .map_err(|e| BannerError::ImageLoad(format!("Failed to decode image: {}", e)))?;
        Ok(image.to_rgba8())
    }
}

/// Extract the payload of a `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, BannerError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| BannerError::ImageLoad("Not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| BannerError::ImageLoad("Malformed data URL: missing ','".into()))?;

    if meta.ends_with(";base64") {
        BASE64
            .decode(payload.trim())
            .map_err(|e| BannerError::ImageLoad(format!("Invalid base64 in data URL: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Cooperative cancellation for in-flight loads. Clones share state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Run `loader` for `source`, giving up after `timeout` or when `cancel`
/// fires, whichever comes first.
pub async fn load_with_deadline(
    loader: &dyn ImageLoader,
    source: &str,
    timeout: Duration,
    cancel: Option<&CancelToken>,
) -> Result<RgbaImage, BannerError> {
    let load = tokio::time::timeout(timeout, loader.load(source));
    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Err(BannerError::Cancelled),
        result = load => match result {
            Ok(loaded) => loaded,
            Err(_) => Err(BannerError::Timeout(timeout.as_millis() as u64)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::encode_png;
    use image::Rgba;

    /// Loader that never resolves.
    struct Stalled;

    #[async_trait]
    impl ImageLoader for Stalled {
        async fn load(&self, _source: &str) -> Result<RgbaImage, BannerError> {
            std::future::pending().await
        }
    }

    fn red_png_data_url() -> String {
        let png = encode_png(&RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]))).unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(png))
    }

    fn loader() -> SourceLoader {
        SourceLoader::new("bannerkit-test").unwrap()
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_data_url("data:text/plain;base64,aGk=").unwrap(), b"hi");
        assert_eq!(decode_data_url("data:,plain").unwrap(), b"plain");
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[tokio::test]
    async fn test_load_data_url() {
        let image = loader().load(&red_png_data_url()).await.unwrap();
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_load_file_and_file_url() {
        let path = std::env::temp_dir().join(format!("bannerkit-loader-{}.png", std::process::id()));
        let png = encode_png(&RgbaImage::from_pixel(3, 2, Rgba([0, 0, 255, 255]))).unwrap();
        std::fs::write(&path, png).unwrap();

        let plain = loader().load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(plain.dimensions(), (3, 2));

        let url = format!("file://{}", path.display());
        let via_url = loader().load(&url).await.unwrap();
        assert_eq!(via_url.dimensions(), (3, 2));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let err = loader()
            .load("/nonexistent/bannerkit/bg.png")
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::ImageLoad(_)));
        assert!(err.is_load_failure());
    }

    #[tokio::test]
    async fn test_undecodable_bytes() {
        let err = loader().load("data:,not-an-image").await.unwrap_err();
        assert!(err.to_string().contains("decode"));
    }

    #[tokio::test]
    async fn test_deadline_times_out() {
        let err = load_with_deadline(&Stalled, "x", Duration::from_millis(20), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::Timeout(20)));
    }

    #[tokio::test]
    async fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let waiter = token.clone();
        let handle = tokio::spawn(async move {
            load_with_deadline(&Stalled, "x", Duration::from_secs(30), Some(&waiter)).await
        });
        token.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(BannerError::Cancelled)));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_passes_through_success() {
        let image = load_with_deadline(
            &loader(),
            &red_png_data_url(),
            Duration::from_secs(5),
            Some(&CancelToken::new()),
        )
        .await
        .unwrap();
        assert_eq!(image.width(), 1);
    }
}
