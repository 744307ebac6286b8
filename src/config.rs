//! # Render Configuration
//!
//! Optional JSON file passed with `--config`. Every field has a default, so
//! an empty object (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "loadTimeoutMs": 15000,
//!   "userAgent": "bannerkit/0.1",
//!   "fonts": [
//!     { "family": "Inter", "regular": "fonts/Inter-Regular.ttf", "bold": "fonts/Inter-Bold.ttf" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::BannerError;

/// Default time allowed for a source image to load.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 15_000;

fn default_load_timeout_ms() -> u64 {
    DEFAULT_LOAD_TIMEOUT_MS
}

fn default_user_agent() -> String {
    format!("bannerkit/{}", env!("CARGO_PKG_VERSION"))
}

/// An outline font family loaded from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    /// Family name matched against `BrandingData::font_family`.
    pub family: String,
    /// Path to the regular weight.
    pub regular: PathBuf,
    /// Path to the bold weight. Bold text is synthesized when absent.
    #[serde(default)]
    pub bold: Option<PathBuf>,
}

/// Settings shared by every render of a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: default_load_timeout_ms(),
            user_agent: default_user_agent(),
            fonts: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self, BannerError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BannerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
            .map_err(|e| BannerError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, BannerError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| BannerError::Config(e.to_string()))?;
        if config.load_timeout_ms == 0 {
            return Err(BannerError::Config(
                "loadTimeoutMs must be greater than zero".into(),
            ));
        }
        Ok(config)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}
