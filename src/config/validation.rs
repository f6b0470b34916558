use crate::config::types::{BrowserConfig, Config, CrawlerConfig, OutputConfig, SelectorConfig};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_target_url(&config.target.url)?;
    validate_crawler_config(&config.crawler)?;
    validate_selectors(&config.selectors)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing URL
fn validate_target_url(url: &str) -> ConfigResult<()> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target url '{}': {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "Target url '{}' must use http or https",
            url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_pages < 1 || config.max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    if config.wait_timeout_secs < 1 || config.wait_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "wait_timeout_secs must be between 1 and 300, got {}",
            config.wait_timeout_secs
        )));
    }

    if config.settle_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "settle_delay_ms must be <= 60000ms, got {}ms",
            config.settle_delay_ms
        )));
    }

    Ok(())
}

/// Validates that every selector is usable as CSS
fn validate_selectors(config: &SelectorConfig) -> ConfigResult<()> {
    for (name, selector) in [
        ("quote", &config.quote),
        ("text", &config.text),
        ("author", &config.author),
        ("tag", &config.tag),
        ("next-page", &config.next_page),
    ] {
        validate_selector(name, selector)?;
    }
    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> ConfigResult<()> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} selector cannot be empty",
            name
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, selector, e))
    })?;

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> ConfigResult<()> {
    if let Some(ref path) = config.chrome_executable {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "chrome_executable cannot be empty when set".to_string(),
            ));
        }
    }

    if let Some(ref remote) = config.remote_debugging_url {
        let parsed = Url::parse(remote).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid remote_debugging_url '{}': {}", remote, e))
        })?;

        if !matches!(parsed.scheme(), "ws" | "wss" | "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "remote_debugging_url '{}' must use ws, wss, http or https",
                remote
            )));
        }
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
