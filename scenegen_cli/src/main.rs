use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scenegen_cli::config::{AppConfig, load_config};
use scenegen_core::{
    BlobCache, CacheConfig, CacheFactory, HttpImageProvider, Orientation, SceneImageService,
    StyleTemplate,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scenegen")]
#[command(author, version, about = "Scene image generation with a durable content cache", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the image for a scene, generating it on a cache miss
    Fetch {
        /// Ordered search terms describing the scene
        #[arg(required = true)]
        terms: Vec<String>,

        /// Target orientation
        #[arg(short, long, value_enum, default_value = "portrait")]
        orientation: OrientationArg,

        /// Animation duration hint in seconds, passed to downstream consumers
        #[arg(long, default_value_t = 5.0)]
        duration: f64,

        /// Bypass the cache and force a fresh generation
        #[arg(long)]
        no_cache: bool,
    },

    /// Remove expired cache entries
    Cleanup,

    /// Remove every cache entry regardless of TTL
    Clear,

    /// Show cache entry count and total size
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

fn build_cache(config: &AppConfig, no_cache: bool) -> Result<Arc<dyn BlobCache>> {
    let cache_config = if no_cache || !config.cache.enabled {
        CacheConfig::NoOp
    } else {
        CacheConfig::File {
            cache_dir: config.cache.resolved_dir(),
            default_ttl: Some(config.cache.default_ttl()),
        }
    };

    CacheFactory::create(cache_config).context("Failed to open the image cache")
}

fn build_provider(config: &AppConfig) -> Result<HttpImageProvider> {
    let api_key = config.provider.api_key.clone().context(
        "Provider API key missing; set SCENEGEN_PROVIDER__API_KEY or provider.api_key in the config file",
    )?;

    let mut provider = HttpImageProvider::new(
        config.provider.base_url.clone(),
        api_key,
        config.provider.model.clone(),
    );
    if let Some(template) = &config.provider.style_template {
        provider = provider.with_style(StyleTemplate::new(template.clone()));
    }
    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.debug { "debug" } else { "warn" }),
    )
    .init();

    let config = load_config(cli.config.clone())?;
    log::debug!("Loaded configuration: cache dir {}", config.cache.resolved_dir().display());

    match cli.command {
        Commands::Fetch {
            terms,
            orientation,
            duration,
            no_cache,
        } => {
            let cache = build_cache(&config, no_cache)?;
            let provider = Arc::new(build_provider(&config)?);
            let service = SceneImageService::new(provider, cache).with_verbose(cli.debug);

            let asset = service
                .fetch(&terms, orientation.into(), duration)
                .await
                .context("Failed to fetch scene image")?;

            println!("id:         {}", asset.id);
            println!("dimensions: {}x{}", asset.width, asset.height);
            println!("duration:   {duration}s");
            if asset.url.starts_with("data:") {
                println!("url:        <embedded {} bytes>", asset.url.len());
            } else {
                println!("url:        {}", asset.url);
            }
        }
        Commands::Cleanup => {
            let cache = build_cache(&config, false)?;
            let removed = cache.cleanup().await?;
            println!("Removed {removed} expired cache entries");
        }
        Commands::Clear => {
            let cache = build_cache(&config, false)?;
            let removed = cache.clear().await?;
            println!("Removed {removed} cache entries");
        }
        Commands::Stats => {
            let cache = build_cache(&config, false)?;
            let stats = cache.stats().await?;
            println!("entries:     {}", stats.entry_count);
            println!("total bytes: {}", stats.total_size_bytes);
        }
    }

    Ok(())
}
