use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const EMBEDDED_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SiteConfig {
    pub ability_list_url: String,
    pub move_list_url: String,
    /// Prefix joined with the `./`-relative links of the move list.
    pub move_link_prefix: String,
    pub pokemon_list_url: String,
    /// Prefix joined with the root-relative links of the pokedex list.
    pub pokemon_link_prefix: String,
    /// Scheme prepended to protocol-relative image sources.
    pub image_scheme: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct HttpConfig {
    pub timeout: u32,
    pub user_agent: String,
    pub image_user_agent: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CrawlConfig {
    pub move_delay_ms: u64,
    pub pokemon_delay_ms: u64,
    pub download_images: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub image_dir: PathBuf,
    pub ability_file: String,
    pub move_file: String,
    pub pokemon_file: String,
}

impl Config {
    /// The configuration bundled into the binary.
    pub fn default_embedded() -> Result<Self> {
        Self::parse(EMBEDDED_CONFIG)
    }

    /// Reads `path` when given, otherwise falls back to the embedded default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    tracing::error!("Failed to read config file {}: {}", path.display(), e);
                    ScrapeError::Config(format!("{}: {}", path.display(), e))
                })?;
                Self::parse(&raw)
            }
            None => Self::default_embedded(),
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| {
            tracing::error!("Failed to parse config: {}", e);
            ScrapeError::from(e)
        })
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout as u64)
    }
}

impl CrawlConfig {
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn pokemon_delay(&self) -> Duration {
        Duration::from_millis(self.pokemon_delay_ms)
    }
}

impl OutputConfig {
    pub fn ability_path(&self) -> PathBuf {
        self.dir.join(&self.ability_file)
    }

    pub fn move_path(&self) -> PathBuf {
        self.dir.join(&self.move_file)
    }

    pub fn pokemon_path(&self) -> PathBuf {
        self.dir.join(&self.pokemon_file)
    }
}
