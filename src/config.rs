use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://howtheyvote.eu/api";
pub const DEFAULT_OBSERVATORY_BASE_URL: &str = "https://oeil.secure.europarl.europa.eu";
/// Source name of the Legislative Observatory procedure file on a vote
pub const PROCEDURE_FILE_SOURCE: &str = "Procedure file (Legislative Observatory)";
pub const DEFAULT_PAGE_SIZE: u32 = 200;
pub const DEFAULT_MAX_PAGES: u32 = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Names a YAML config file when `--config` is not given
pub const CONFIG_FILE_ENV: &str = "EP_VOTES_CONFIG";
/// Overrides the votes API base URL from the config file
pub const API_URL_ENV: &str = "EP_VOTES_API_URL";

/// Configuration for the vote pipeline
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub observatory_base_url: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub timeout: Duration,
    pub retries: u32,
    pub user_agent: String,
    pub summary_source_name: String,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            observatory_base_url: DEFAULT_OBSERVATORY_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            user_agent: format!("ep-votes/{}", env!("CARGO_PKG_VERSION")),
            summary_source_name: PROCEDURE_FILE_SOURCE.to_string(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("observatory_base_url", &self.observatory_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.page_size == 0 {
            return Err(Error::Config("page_size must be greater than 0".to_string()));
        }

        if self.max_pages == 0 {
            return Err(Error::Config("max_pages must be greater than 0".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// `GET /votes` listing endpoint
    pub fn votes_url(&self) -> String {
        format!("{}/votes", self.api_base_url)
    }

    /// `GET /votes/{id}` detail endpoint
    pub fn vote_url(&self, vote_id: u64) -> String {
        format!("{}/votes/{}", self.api_base_url, vote_id)
    }

    /// Static member portrait endpoint
    pub fn member_photo_url(&self, member_id: u64) -> String {
        format!("{}/static/members/{}.jpg", self.api_base_url, member_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional settings read from a YAML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub observatory_base_url: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// Settings given as command-line flags
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    /// Set the votes API base URL (no trailing slash needed)
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the Legislative Observatory host used for summary redirects
    pub fn observatory_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.observatory_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Cap on listing pages before giving up on `has_next`
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Extra attempts after a transport failure or 5xx response
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Apply every setting present in a config file
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(url) = file.api_base_url {
            self = self.api_base_url(url);
        }
        if let Some(url) = file.observatory_base_url {
            self = self.observatory_base_url(url);
        }
        if let Some(page_size) = file.page_size {
            self = self.page_size(page_size);
        }
        if let Some(max_pages) = file.max_pages {
            self = self.max_pages(max_pages);
        }
        if let Some(secs) = file.timeout_secs {
            self = self.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = file.retries {
            self = self.retries(retries);
        }
        if let Some(user_agent) = file.user_agent {
            self = self.user_agent(user_agent);
        }
        self
    }

    /// Load a YAML config file and apply it
    pub fn config_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        Ok(self.merge_file(FileConfig::load(path)?))
    }

    /// Layer every configuration source over the defaults, lowest precedence
    /// first: the YAML file, the environment, then command-line flags.
    /// `env` looks up an environment variable by name.
    pub fn layered<E>(flags: &CliOverrides, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new();

        let config_file = flags
            .config_file
            .clone()
            .or_else(|| env(CONFIG_FILE_ENV).map(PathBuf::from));
        if let Some(path) = config_file {
            builder = builder.config_file(path)?;
        }

        if let Some(url) = env(API_URL_ENV) {
            builder = builder.api_base_url(url);
        }

        if let Some(url) = &flags.api_base_url {
            builder = builder.api_base_url(url.clone());
        }
        if let Some(secs) = flags.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = flags.retries {
            builder = builder.retries(retries);
        }

        Ok(builder)
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
