//! # Bannerkit CLI
//!
//! Command-line interface for rendering advertising banners.
//!
//! ## Usage
//!
//! ```bash
//! # Render one banner
//! bannerkit render --headline "Get 50% off today" --image bg.png --size 336x280 \
//!     --template red_white --out banner.png
//!
//! # Branded banner, variant 2, with brand colors from a JSON file
//! bannerkit render --headline "Neue Kollektion" --image https://cdn.example.com/bg.jpg \
//!     --template branded --variant 2 --branding brand.json --out banner.png
//!
//! # Render every spec of a JSON array concurrently
//! bannerkit batch specs.json --out-dir out/
//!
//! # More logging
//! RUST_LOG=bannerkit=debug bannerkit render ...
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

use bannerkit::{
    BannerError, BannerRequest, TemplateComposer,
    config::RenderConfig,
    output::{self, BannerArtifact, BannerMetadata},
    request::{BannerSpec, BrandingData},
};

/// Bannerkit - advertising banner renderer
#[derive(Parser, Debug)]
#[command(name = "bannerkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Render configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a single banner to a PNG file
    Render {
        /// Headline text (at most 100 characters)
        #[arg(long)]
        headline: String,

        /// Background image: URL, data URL or file path
        #[arg(long)]
        image: String,

        /// Banner size as WIDTHxHEIGHT
        #[arg(long, default_value = "300x250")]
        size: String,

        /// Template: blue_white, red_white or branded
        #[arg(long, default_value = "red_white")]
        template: String,

        /// Branded variant (1, 2 or 3); defaults to cycling by --index
        #[arg(long)]
        variant: Option<u8>,

        /// Position of the banner within its batch
        #[arg(long, default_value = "0")]
        index: usize,

        /// Branding data file (JSON: title, industry, colors, fonts)
        #[arg(long, value_name = "FILE")]
        branding: Option<PathBuf>,

        /// Background was uploaded by the user
        #[arg(long)]
        uploaded: bool,

        /// Seed for palette and gradient choices
        #[arg(long)]
        seed: Option<u64>,

        /// Model that generated the background (shown on the fallback)
        #[arg(long)]
        model: Option<String>,

        /// Output PNG path
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Render a JSON array of banner specs concurrently
    Batch {
        /// JSON file containing an array of banner specs
        specs: PathBuf,

        /// Directory for banner-<i>.png files and manifest.json
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },
}

/// One line of `manifest.json`.
#[derive(Serialize)]
struct ManifestEntry {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(flatten)]
    metadata: BannerMetadata,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BannerError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let composer = TemplateComposer::from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Render {
            headline,
            image,
            size,
            template,
            variant,
            index,
            branding,
            uploaded,
            seed,
            model,
            out,
        } => {
            let branding_data = branding.as_deref().map(read_branding).transpose()?;
            let request = BannerRequest::try_from(BannerSpec {
                headline,
                image_url: image,
                size,
                template,
                branding_data,
                selected_variant: variant,
                is_uploaded_image: uploaded,
                banner_index: Some(index),
                seed,
                source_model: model,
            })?;

            println!(
                "Rendering {} banner ({})...",
                request.template, request.size
            );
            let outcome = runtime.block_on(composer.render(&request));
            let exported = output::export(&request, outcome);

            match &exported.artifact {
                BannerArtifact::Png(bytes) => {
                    std::fs::write(&out, bytes)?;
                    println!("Saved to {}", out.display());
                }
                BannerArtifact::OriginalUrl(url) => {
                    println!("Composition failed, use the original image: {}", url);
                }
            }
            println!("{}", to_json(&exported.metadata)?);
        }

        Commands::Batch { specs, out_dir } => {
            let requests = read_specs(&specs)?;
            std::fs::create_dir_all(&out_dir)?;
            println!(
                "Rendering {} banners into {}...",
                requests.len(),
                out_dir.display()
            );

            let manifest = runtime.block_on(render_batch(&composer, requests, &out_dir))?;
            let manifest_path = out_dir.join("manifest.json");
            std::fs::write(&manifest_path, to_json(&manifest)?)?;

            let fallbacks = manifest.iter().filter(|e| e.metadata.is_fallback).count();
            println!(
                "Rendered {} banners ({} fallback), manifest at {}",
                manifest.len(),
                fallbacks,
                manifest_path.display()
            );
        }
    }

    Ok(())
}

/// Render every request concurrently and write the PNGs.
async fn render_batch(
    composer: &TemplateComposer,
    requests: Vec<BannerRequest>,
    out_dir: &Path,
) -> Result<Vec<ManifestEntry>, BannerError> {
    let mut tasks = JoinSet::new();
    for (index, request) in requests.into_iter().enumerate() {
        let composer = composer.clone();
        tasks.spawn(async move {
            let outcome = composer.render(&request).await;
            (index, output::export(&request, outcome))
        });
    }

    let mut manifest = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, exported) = joined
            .map_err(|e| BannerError::Composition(format!("Render task failed: {}", e)))?;

        let file = match &exported.artifact {
            BannerArtifact::Png(bytes) => {
                let name = format!("banner-{}.png", index);
                std::fs::write(out_dir.join(&name), bytes)?;
                Some(name)
            }
            BannerArtifact::OriginalUrl(_) => None,
        };
        manifest.push(ManifestEntry {
            index,
            file,
            metadata: exported.metadata,
        });
    }

    manifest.sort_by_key(|entry| entry.index);
    Ok(manifest)
}

fn read_branding(path: &Path) -> Result<BrandingData, BannerError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        BannerError::InvalidRequest(format!("Invalid branding file {}: {}", path.display(), e))
    })
}

/// Read a JSON array of specs. Specs without a `bannerIndex` take their
/// array position.
fn read_specs(path: &Path) -> Result<Vec<BannerRequest>, BannerError> {
    let text = std::fs::read_to_string(path)?;
    let specs: Vec<BannerSpec> = serde_json::from_str(&text).map_err(|e| {
        BannerError::InvalidRequest(format!("Invalid spec file {}: {}", path.display(), e))
    })?;

    specs
        .into_iter()
        .enumerate()
        .map(|(i, mut spec)| {
            spec.banner_index.get_or_insert(i);
            BannerRequest::try_from(spec)
                .map_err(|e| BannerError::InvalidRequest(format!("Spec {}: {}", i, e)))
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, BannerError> {
    serde_json::to_string_pretty(value).map_err(|e| BannerError::Encode(e.to_string()))
}
