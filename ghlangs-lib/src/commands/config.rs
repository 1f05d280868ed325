use crate::Result;
use crate::collect::{PageLimits, RetryPolicy};
use crate::reports::{DEFAULT_MIN_PERCENTAGE, DEFAULT_TITLE, SvgOptions};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the current directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "ghlangs.toml";

const MAX_PAGE_SIZE: u8 = 100;
const MAX_CONCURRENT_REQUESTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum share (in percent) for a language to be shown on the card
    #[serde(default = "default_min_percentage")]
    pub min_percentage: f64,

    /// Title of the SVG card
    #[serde(default = "default_title")]
    pub title: String,

    /// Maximum number of GraphQL queries in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Attempts per query, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause taken before every attempt
    #[serde(default = "default_request_delay", with = "humantime_serde")]
    pub request_delay: Duration,

    /// Wait after a rate-limited response
    #[serde(default = "default_rate_limit_cooldown", with = "humantime_serde")]
    pub rate_limit_cooldown: Duration,

    /// Base of the exponential backoff after transport failures
    #[serde(default = "default_backoff_base", with = "humantime_serde")]
    pub backoff_base: Duration,

    /// Timeout for one HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Repositories requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Languages requested per repository
    #[serde(default = "default_languages_per_repository")]
    pub languages_per_repository: u8,

    /// Pages fetched per repository list before giving up
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

const fn default_min_percentage() -> f64 {
    DEFAULT_MIN_PERCENTAGE
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

const fn default_max_concurrent_requests() -> usize {
    3
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_request_delay() -> Duration {
    RetryPolicy::default().request_delay
}

fn default_rate_limit_cooldown() -> Duration {
    RetryPolicy::default().rate_limit_cooldown
}

fn default_backoff_base() -> Duration {
    RetryPolicy::default().backoff_base
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_page_size() -> u8 {
    PageLimits::default().page_size
}

fn default_languages_per_repository() -> u8 {
    PageLimits::default().languages_per_repository
}

fn default_max_pages() -> u32 {
    PageLimits::default().max_pages
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `ghlangs.toml` in `base_dir` is used when it exists.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading ghlangs configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading ghlangs configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_percentage) {
            return Err(app_err!("min_percentage must be between 0 and 100, got {}", self.min_percentage));
        }

        if !(1..=MAX_CONCURRENT_REQUESTS).contains(&self.max_concurrent_requests) {
            return Err(app_err!(
                "max_concurrent_requests must be between 1 and {MAX_CONCURRENT_REQUESTS}, got {}",
                self.max_concurrent_requests
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.max_attempts == 0 {
            return Err(app_err!("max_attempts must be at least 1"));
        }

        if self.max_pages == 0 {
            return Err(app_err!("max_pages must be at least 1"));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.languages_per_repository) {
            return Err(app_err!(
                "languages_per_repository must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.languages_per_repository
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            request_delay: self.request_delay,
            rate_limit_cooldown: self.rate_limit_cooldown,
            backoff_base: self.backoff_base,
        }
    }

    #[must_use]
    pub const fn page_limits(&self) -> PageLimits {
        PageLimits {
            page_size: self.page_size,
            languages_per_repository: self.languages_per_repository,
            max_pages: self.max_pages,
        }
    }

    #[must_use]
    pub fn svg_options(&self) -> SvgOptions {
        SvgOptions {
            title: self.title.clone(),
            min_percentage: self.min_percentage,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_percentage: default_min_percentage(),
            title: default_title(),
            max_concurrent_requests: default_max_concurrent_requests(),
            max_attempts: default_max_attempts(),
            request_delay: default_request_delay(),
            rate_limit_cooldown: default_rate_limit_cooldown(),
            backoff_base: default_backoff_base(),
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            languages_per_repository: default_languages_per_repository(),
            max_pages: default_max_pages(),
        }
    }
}
