use serde::Deserialize;

/// Default site the dictionary is scraped from
pub const DEFAULT_BASE_URL: &str = "https://tatar_russian.academic.ru/";

/// Default JSON output file
pub const DEFAULT_JSON_PATH: &str = "tatar-russian.json";

/// Default CSV output file
pub const DEFAULT_CSV_PATH: &str = "tatar-russian.csv";

/// Main configuration structure for tatdict
///
/// Every section and key is optional; a missing file or an empty file
/// yields `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base address every discovered link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Skip TLS certificate validation (insecure)
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// How the coordinator schedules the three fan-out levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlStrategy {
    /// Launch the whole tree at once; each fetch holds a permit only for itself
    #[default]
    Streaming,

    /// Finish each level before starting the next, in chunks of the budget size
    Staged,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Orchestration strategy
    pub strategy: CrawlStrategy,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// TCP/TLS connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 3000,
            strategy: CrawlStrategy::Streaming,
            request_timeout_secs: 60,
            connect_timeout_secs: 20,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON dictionary file
    #[serde(rename = "json-path")]
    pub json_path: String,

    /// Path to the CSV dictionary file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: DEFAULT_JSON_PATH.to_string(),
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}
