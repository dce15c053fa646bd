//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::generate::{GenerateConfig, ImageApiConfig, DEFAULT_BATCH_SIZE, DEFAULT_IMAGE_API, IMAGE_REFILL};
use crate::store::{StoreConfig, DEFAULT_MAX_PAGES, DEFAULT_TRIGGER_WINDOW};

/// Where the published fake API lives; page `n` is `{base}{n}.json`.
pub const DEFAULT_URL_BASE: &str =
    "https://raw.githubusercontent.com/arthur-eudeline/cross-platform-comparison/main/fake-api/api-";

#[derive(Parser, Debug)]
#[command(name = "content-cards", version)]
#[command(about = "Browse a paginated JSON feed of content cards in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub browse: BrowseArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate paginated fake-API files from a seed record set
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    /// Page URL prefix; the page number and `.json` are appended
    #[arg(long, env = "CONTENT_URL_BASE", default_value = DEFAULT_URL_BASE)]
    pub url_base: String,

    /// Highest page number to request
    #[arg(long, env = "CONTENT_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// How many of the last cards trigger the next page when they scroll into view
    #[arg(long, default_value_t = DEFAULT_TRIGGER_WINDOW)]
    pub trigger_window: usize,

    /// Log file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl BrowseArgs {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_pages: self.max_pages,
            trigger_window: self.trigger_window,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("content-cards.log"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Seed file: a JSON array of records without images
    #[arg(long, default_value = "fake-api/sources/initial-data.json")]
    pub seed: PathBuf,

    /// Directory receiving api-1.json, api-2.json, ...
    #[arg(long, default_value = "fake-api")]
    pub out_dir: PathBuf,

    /// Records per page file
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = clap::value_parser!(u16).range(1..))]
    pub batch_size: u16,

    /// Ignore the cached seed-with-images file and fetch fresh image URLs
    #[arg(long)]
    pub skip_cache: bool,

    /// Image API access key
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Image API base URL
    #[arg(long, default_value = DEFAULT_IMAGE_API)]
    pub image_api: String,
}

impl GenerateArgs {
    pub fn generate_config(&self) -> GenerateConfig {
        GenerateConfig {
            seed: self.seed.clone(),
            out_dir: self.out_dir.clone(),
            batch_size: usize::from(self.batch_size),
            skip_cache: self.skip_cache,
            images: ImageApiConfig {
                base_url: self.image_api.clone(),
                access_key: self.access_key.clone(),
                refill: IMAGE_REFILL,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_api() {
        let cli = Cli::try_parse_from(["content-cards"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.browse.url_base, DEFAULT_URL_BASE);
        assert_eq!(cli.browse.store_config(), StoreConfig::default());
    }

    #[test]
    fn browse_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "content-cards",
            "--url-base",
            "http://localhost:8000/api-",
            "--max-pages",
            "3",
            "--trigger-window",
            "2",
        ])
        .unwrap();

        let config = cli.browse.store_config();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.trigger_window, 2);
        assert_eq!(cli.browse.url_base, "http://localhost:8000/api-");
    }

    #[test]
    fn generate_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "content-cards",
            "generate",
            "--seed",
            "seed.json",
            "--out-dir",
            "out",
            "--batch-size",
            "5",
            "--skip-cache",
            "--access-key",
            "abc",
        ])
        .unwrap();

        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        let config = args.generate_config();
        assert_eq!(config.seed, PathBuf::from("seed.json"));
        assert_eq!(config.batch_size, 5);
        assert!(config.skip_cache);
        assert_eq!(config.images.access_key.as_deref(), Some("abc"));
        assert_eq!(config.images.refill, IMAGE_REFILL);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let result = Cli::try_parse_from(["content-cards", "generate", "--batch-size", "0"]);
        assert!(result.is_err());
    }
}
