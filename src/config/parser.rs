use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the same settings.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettleMode;
    use crate::{ConfigError, HarvestError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[target]
url = "https://quotes.example.com/js/"

[crawler]
max-pages = 3
wait-timeout-secs = 4
settle-delay-ms = 250
settle-mode = "content-change"

[selectors]
next-page = "a.next"

[browser]
headless = false
chrome-executable = "/usr/bin/chromium"

[output]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target.url, "https://quotes.example.com/js/");
        assert_eq!(config.crawler.max_pages, 3);
        assert_eq!(config.crawler.wait_timeout_secs, 4);
        assert_eq!(config.crawler.settle_mode, SettleMode::ContentChange);
        assert_eq!(config.selectors.next_page, "a.next");
        assert_eq!(config.selectors.quote, ".quote");
        assert!(!config.browser.headless);
        assert_eq!(
            config.browser.chrome_executable.as_deref(),
            Some("/usr/bin/chromium")
        );
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.target.url, "http://quotes.toscrape.com/js/");
        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.wait_timeout_secs, 10);
        assert_eq!(config.crawler.settle_delay_ms, 1000);
        assert_eq!(config.crawler.settle_mode, SettleMode::Fixed);
        assert_eq!(config.selectors.next_page, "li.next > a");
        assert!(config.browser.headless);
        assert_eq!(config.output.database_path, "quotes.db");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_settle_mode_is_rejected() {
        let result = parse_config("[crawler]\nsettle-mode = \"whenever\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-pages = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_config_error_converts_to_harvest_error() {
        let file = create_temp_config("[crawler]\nmax-pages = 0\n");
        let err: HarvestError = load_config(file.path()).unwrap_err().into();

        assert!(matches!(err, HarvestError::Config(ConfigError::Validation(_))));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
