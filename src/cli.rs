use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use media_paths::dev::{DevLogRelay, ReloadWatcher, is_local_host};
use media_paths::models::Ancestor;
use media_paths::{
    ConfigError, ElementContext, MediaConfig, MediaKind, MediaPathResolver, PageRewriter, logging,
};

/// Resolve and rewrite media paths in rendered site pages
#[derive(Parser)]
#[command(name = "media-paths")]
#[command(about = "Rewrite media references in rendered pages to their canonical paths", long_about = None)]
pub struct Cli {
    /// Explicit configuration file (defaults to media.config.json in the site root)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite every page under a site root once
    Rewrite {
        /// Directory holding the rendered pages
        site_root: PathBuf,
    },
    /// Resolve a single media reference
    Resolve {
        /// Path as authored on the element
        path: String,
        /// Table to resolve against
        #[arg(short, long, default_value = "images")]
        kind: MediaKind,
        /// URL path of the page the element is on
        #[arg(short, long, default_value = "/")]
        page: String,
        /// Enclosing element as `tag.class.class`, nearest first; repeatable
        #[arg(short, long = "ancestor")]
        ancestors: Vec<String>,
    },
    /// Resolve a preview filename
    Preview {
        /// Bare filename from the preview attribute
        filename: String,
        /// The element sits inside a testimonial block
        #[arg(short, long)]
        testimonial: bool,
    },
    /// Print the served path of a file in a category
    Lookup {
        /// images or videos
        kind: MediaKind,
        /// Category name
        category: String,
        /// Filename to place in the category directory
        filename: String,
    },
    /// Rewrite a site, then re-run whenever the development server reports an update
    Watch {
        /// Directory holding the rendered pages
        site_root: PathBuf,
        /// Override the timestamp resource URL
        #[arg(long)]
        url: Option<String>,
        /// Override the polling interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Cli {
    /// Parse arguments, set up logging and run the selected command.
    pub async fn run_from_args() -> Result<()> {
        Self::parse().run().await
    }

    async fn run(self) -> Result<()> {
        let (mut config, discovery_error) = self.load_config()?;

        if let Commands::Watch { url, interval, .. } = &self.command {
            if let Some(url) = url {
                config.dev.timestamp_url = url.clone();
            }
            if let Some(interval) = interval {
                config.dev.poll_interval_secs = *interval;
            }
            init_watch_logging(&config)?;
        } else {
            logging::init(None)?;
        }

        if let Some(err) = discovery_error {
            tracing::warn!("{err}; using built-in media tables");
        }

        match self.command {
            Commands::Rewrite { site_root } => rewrite(config, &site_root),
            Commands::Resolve {
                path,
                kind,
                page,
                ancestors,
            } => {
                resolve(config, &path, kind, page, &ancestors);
                Ok(())
            }
            Commands::Preview {
                filename,
                testimonial,
            } => {
                preview(config, &filename, testimonial);
                Ok(())
            }
            Commands::Lookup {
                kind,
                category,
                filename,
            } => {
                lookup(config, kind, &category, &filename);
                Ok(())
            }
            Commands::Watch { site_root, .. } => watch(config, &site_root).await,
        }
    }

    /// Configuration for this run, plus the discovery error when a site config was
    /// unusable and the built-in tables were substituted. Runs before logging is installed,
    /// so the caller reports the error.
    fn load_config(&self) -> Result<(MediaConfig, Option<ConfigError>)> {
        if let Some(path) = &self.config {
            let config = MediaConfig::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            return Ok((config, None));
        }

        let dir = match &self.command {
            Commands::Rewrite { site_root } | Commands::Watch { site_root, .. } => site_root.clone(),
            _ => std::env::current_dir().context("failed to read current directory")?,
        };
        Ok(match MediaConfig::discover(&dir) {
            Ok(config) => (config, None),
            Err(err) => (MediaConfig::default(), Some(err)),
        })
    }
}

fn rewrite(config: MediaConfig, site_root: &Path) -> Result<()> {
    let resolver = MediaPathResolver::new(config);
    let report = PageRewriter::new(&resolver).rewrite_site(site_root)?;
    println!(
        "updated {} element(s), skipped {}, unresolved {}",
        report.updated, report.skipped, report.unresolved
    );
    Ok(())
}

fn resolve(config: MediaConfig, path: &str, kind: MediaKind, page: String, ancestors: &[String]) {
    let context = ElementContext {
        page_path: page,
        ancestors: ancestors.iter().map(String::as_str).map(parse_ancestor).collect(),
    };
    let resolution = MediaPathResolver::new(config).resolve(path, kind, &context);
    println!("{}", resolution.value().unwrap_or(path));
}

fn preview(config: MediaConfig, filename: &str, testimonial: bool) {
    let resolution = MediaPathResolver::new(config).resolve_preview(filename, testimonial);
    println!("{}", resolution.value().unwrap_or(filename));
}

fn lookup(config: MediaConfig, kind: MediaKind, category: &str, filename: &str) {
    println!("{}", MediaPathResolver::new(config).path_for(kind, category, filename));
}

fn init_watch_logging(config: &MediaConfig) -> Result<()> {
    if !is_local_host(&config.dev.site_host) {
        return logging::init(None);
    }

    let (relay, worker) = DevLogRelay::new(config.dev.log_endpoint.clone());
    tokio::spawn(worker.run());
    logging::init(Some(relay))
}

async fn watch(config: MediaConfig, site_root: &Path) -> Result<()> {
    let watcher = ReloadWatcher::new(&config.dev)?;
    let resolver = MediaPathResolver::new(config);
    let rewriter = PageRewriter::new(&resolver);

    rewriter.rewrite_site(site_root)?;
    watcher
        .run(|| {
            if let Err(err) = rewriter.rewrite_site(site_root) {
                tracing::warn!("reload failed: {err:#}");
            }
        })
        .await;

    Ok(())
}

/// Parse `tag.class.class` into an ancestor; a missing tag means `div`.
fn parse_ancestor(spec: &str) -> Ancestor {
    let mut parts = spec.split('.');
    let tag = parts.next().filter(|tag| !tag.is_empty()).unwrap_or("div");
    let classes: Vec<&str> = parts.filter(|class| !class.is_empty()).collect();
    Ancestor::new(tag, &classes.join(" "))
}
