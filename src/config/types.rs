use serde::Deserialize;

/// Main configuration structure for Quote-Harvest
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the listing lives
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Address of the first listing page
    #[serde(default = "default_url")]
    pub url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of listing pages to visit
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// How long to wait for quote blocks to render (seconds)
    #[serde(rename = "wait-timeout-secs", default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after clicking the next-page control (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// How to decide a page advance has finished rendering
    #[serde(rename = "settle-mode", default)]
    pub settle_mode: SettleMode,
}

/// Strategy applied after a page-advance click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettleMode {
    /// Sleep for the settle delay and nothing else
    #[default]
    Fixed,

    /// Sleep for the settle delay, then wait for the first quote to change
    ContentChange,
}

/// CSS selectors addressing the listing markup
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_quote_selector")]
    pub quote: String,

    #[serde(default = "default_text_selector")]
    pub text: String,

    #[serde(default = "default_author_selector")]
    pub author: String,

    #[serde(default = "default_tag_selector")]
    pub tag: String,

    #[serde(rename = "next-page", default = "default_next_page_selector")]
    pub next_page: String,
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit path to a Chrome/Chromium binary
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<String>,

    /// Connect to an already running browser instead of launching one
    #[serde(rename = "remote-debugging-url", default)]
    pub remote_debugging_url: Option<String>,

    /// Timeout for individual DevTools protocol requests (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

fn default_url() -> String {
    "http://quotes.toscrape.com/js/".to_string()
}

fn default_max_pages() -> u32 {
    5
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_quote_selector() -> String {
    ".quote".to_string()
}

fn default_text_selector() -> String {
    ".text".to_string()
}

fn default_author_selector() -> String {
    ".author".to_string()
}

fn default_tag_selector() -> String {
    ".tag".to_string()
}

fn default_next_page_selector() -> String {
    "li.next > a".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_database_path() -> String {
    "quotes.db".to_string()
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            wait_timeout_secs: default_wait_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            settle_mode: SettleMode::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            quote: default_quote_selector(),
            text: default_text_selector(),
            author: default_author_selector(),
            tag: default_tag_selector(),
            next_page: default_next_page_selector(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_executable: None,
            remote_debugging_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl CrawlerConfig {
    pub fn wait_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settle_delay_ms)
    }
}
