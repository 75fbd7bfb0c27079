use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{ConfigError, Result};
use crate::sweep::FailurePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_urls")]
    pub urls: Vec<String>,

    /// Entries examined per feed on each update sweep
    #[serde(default = "default_per_feed_limit")]
    pub per_feed_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Number of oldest articles removed by a cleanup sweep
    #[serde(default = "default_retention_bound")]
    pub retention_bound: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Candidate images must be strictly larger than this many bytes
    #[serde(default = "default_min_bytes")]
    pub min_bytes: usize,

    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,

    #[serde(default = "default_browser_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, else from the default location, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => {
                let default_path = Self::config_file()?;
                if default_path.exists() {
                    Self::load_with_env(default_path)
                } else {
                    let mut config = Self::default();
                    config.apply_env_overrides();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for url in &self.feeds.urls {
            let parsed = url::Url::parse(url)
                .map_err(|_| ConfigError::InvalidUrl(url.clone()))?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        if self.feeds.per_feed_limit == 0 {
            return Err(ConfigError::Config("Per-feed limit must be greater than 0".to_string()));
        }

        if self.store.recent_limit == 0 {
            return Err(ConfigError::Config("Recent limit must be greater than 0".to_string()));
        }

        if self.store.retention_bound == 0 {
            return Err(ConfigError::Config("Retention bound must be greater than 0".to_string()));
        }

        if self.images.fallback_url.is_empty() {
            return Err(ConfigError::Config("Fallback image URL cannot be empty".to_string()));
        }

        if self.settings.timeout == 0 {
            return Err(ConfigError::Config("Timeout must be greater than 0".to_string()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("NEWS_SWEEP_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("NEWS_SWEEP_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(limit) = std::env::var("NEWS_SWEEP_PER_FEED_LIMIT") {
            if let Ok(val) = limit.parse() {
                self.feeds.per_feed_limit = val;
            }
        }

        if let Ok(bound) = std::env::var("NEWS_SWEEP_RETENTION_BOUND") {
            if let Ok(val) = bound.parse() {
                self.store.retention_bound = val;
            }
        }
    }

    pub fn default() -> Self {
        Self {
            feeds: FeedSettings::default(),
            store: StoreSettings::default(),
            images: ImageSettings::default(),
            settings: Settings::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("news-sweep"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("news-sweep"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine data directory".to_string()))
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            urls: default_feed_urls(),
            per_feed_limit: default_per_feed_limit(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            recent_limit: default_recent_limit(),
            retention_bound: default_retention_bound(),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            min_bytes: default_min_bytes(),
            fallback_url: default_fallback_url(),
            user_agent: default_browser_user_agent(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            failure_policy: FailurePolicy::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_file: default_log_file(),
            json_format: false,
        }
    }
}

fn default_feed_urls() -> Vec<String> {
    vec![
        "http://feeds.bbci.co.uk/news/rss.xml?edition=uk".to_string(),
        "http://www.thairath.co.th/rss/news.xml".to_string(),
        "https://www.bangkokpost.com/rss/data/thailand.xml".to_string(),
    ]
}
fn default_per_feed_limit() -> usize { 3 }

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("news-sweep")
        .join("articles.json")
}
fn default_recent_limit() -> usize { 48 }
fn default_retention_bound() -> usize { 50 }

fn default_min_bytes() -> usize { crate::content::DEFAULT_MIN_IMAGE_BYTES }
fn default_fallback_url() -> String { crate::content::FALLBACK_IMAGE_URL.to_string() }
fn default_browser_user_agent() -> String { crate::content::BROWSER_USER_AGENT.to_string() }

fn default_timeout() -> u64 { 30 }
fn default_user_agent() -> String {
    format!("news-sweep/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_file() -> String { "logs/news-sweep.log".to_string() }
