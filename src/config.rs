use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const STORE_FILE: &str = "feed-store.json";
const IMAGES_DIR: &str = "images";

/// Where the cache lives and where the feed comes from.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Unparsed; only `fetch` needs it, so a bad value must not break other commands.
    pub feed_url: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the environment
    /// `NAVIFEED_DATA_DIR` wins, then the XDG data directory, then `~/.local/share`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = if let Some(dir) = var("NAVIFEED_DATA_DIR") {
            PathBuf::from(dir)
        } else if let Some(xdg_data) = var("XDG_DATA_HOME") {
            PathBuf::from(xdg_data).join("navifeed")
        } else {
            let home = var("HOME").unwrap_or_else(|| ".".to_string());
            PathBuf::from(home).join(".local/share/navifeed")
        };

        Self {
            data_dir,
            feed_url: var("NAVIFEED_FEED_URL"),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_data_dir(mut self, raw: &str) -> Self {
        self.data_dir = PathBuf::from(shellexpand::tilde(raw).to_string());
        self
    }

    pub fn with_feed_url(mut self, raw: &str) -> Self {
        self.feed_url = Some(raw.to_string());
        self
    }

    /// The feed endpoint, parsed on demand.
    pub fn feed_url(&self) -> Result<Url> {
        let raw = self
            .feed_url
            .as_deref()
            .context("No feed URL given; pass --url or set NAVIFEED_FEED_URL")?;
        Url::parse(raw).with_context(|| format!("Invalid feed URL: {}", raw))
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join(IMAGES_DIR)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
