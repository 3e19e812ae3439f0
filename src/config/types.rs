use crate::config::validation::validate_version_code;
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.bskorea.or.kr/bible/korbibReadpage.php";
pub const DEFAULT_VERSION_CODE: &str = "GAE";
pub const DEFAULT_VERSION_NAME: &str = "개역개정";
pub const DEFAULT_VERSION_LANG: &str = "ko";
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Bible-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub version: VersionConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds the orchestrator options described by this configuration
    pub fn crawler_options(&self) -> CrawlerOptions {
        CrawlerOptions {
            base_url: self.crawler.base_url.clone(),
            version_code: self.version.code.clone(),
            version_name: self.version.name.clone(),
            version_lang: self.version.lang.clone(),
            requests_per_second: self.crawler.requests_per_second,
            timeout: Duration::from_secs(self.crawler.timeout_secs),
            user_agent: self.user_agent.header_value(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Chapter page endpoint; version, book and chapter are sent as query parameters
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Sustained request rate against the source site
    #[serde(rename = "requests-per-second", default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// The corpus version (translation) being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct VersionConfig {
    #[serde(default = "default_version_code")]
    pub code: String,

    #[serde(default = "default_version_name")]
    pub name: String,

    #[serde(default = "default_version_lang")]
    pub lang: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            code: default_version_code(),
            name: default_version_name(),
            lang: default_version_lang(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// Free-form comment sent in parentheses
    #[serde(default = "default_contact")]
    pub contact: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (contact)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} ({})",
            self.crawler_name, self.crawler_version, self.contact
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact: default_contact(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Options consumed by the crawl orchestrator
///
/// Every field has a default matching the public source site, so tests and
/// embedders only override what they need:
///
/// ```
/// use bible_harvest::config::CrawlerOptions;
///
/// let options = CrawlerOptions {
///     base_url: "http://127.0.0.1:8080/read".to_string(),
///     requests_per_second: 100.0,
///     ..CrawlerOptions::default()
/// };
/// assert_eq!(options.version_code, "GAE");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlerOptions {
    /// Chapter page endpoint
    pub base_url: String,

    /// Corpus version code sent to the site and used as checkpoint key
    pub version_code: String,

    /// Human-readable version name stored with the version row
    pub version_name: String,

    /// Language tag stored with the version row
    pub version_lang: String,

    /// Requests per second; the limiter spaces requests `1 / rps` apart
    pub requests_per_second: f64,

    /// Whole-request timeout
    pub timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for CrawlerOptions {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version_code: default_version_code(),
            version_name: default_version_name(),
            version_lang: default_version_lang(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: UserAgentConfig::default().header_value(),
        }
    }
}

impl CrawlerOptions {
    /// Overrides the version code after checking it like the config file's
    pub fn with_version_code(mut self, code: &str) -> Result<Self, ConfigError> {
        validate_version_code(code)?;
        self.version_code = code.to_string();
        Ok(self)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_requests_per_second() -> f64 {
    DEFAULT_REQUESTS_PER_SECOND
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_version_code() -> String {
    DEFAULT_VERSION_CODE.to_string()
}

fn default_version_name() -> String {
    DEFAULT_VERSION_NAME.to_string()
}

fn default_version_lang() -> String {
    DEFAULT_VERSION_LANG.to_string()
}

fn default_crawler_name() -> String {
    "BibleHarvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact() -> String {
    "Personal; non-commercial".to_string()
}
