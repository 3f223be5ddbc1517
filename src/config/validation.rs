use crate::config::types::{Config, CrawlerConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 120_000;
const MAX_PAGE_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates the listing source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.value).is_err() {
        return Err(ConfigError::Validation(format!(
            "user agent '{}' is not a valid header value",
            config.value
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_timeout("fetch_timeout_ms", config.fetch_timeout_ms)?;
    validate_timeout("probe_timeout_ms", config.probe_timeout_ms)?;

    if config.page_delay_ms > MAX_PAGE_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "page_delay_ms must be <= {}ms, got {}ms",
            MAX_PAGE_DELAY_MS, config.page_delay_ms
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(name: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}ms, got {}ms",
            name, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, value
        )));
    }
    Ok(())
}
