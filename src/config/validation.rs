use crate::config::types::{Config, CrawlerConfig, FetcherConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.retry_attempts > 100 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be <= 100, got {}",
            config.retry_attempts
        )));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 1024 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 1024, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.crawl_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "crawl-timeout-secs must be greater than 0 when set".to_string(),
        ));
    }

    for tag in &config.exclude_tags {
        if tag.is_empty() {
            return Err(ConfigError::Validation(
                "exclude-tags cannot contain an empty tag name".to_string(),
            ));
        }

        if tag.chars().any(|c| c.is_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "exclude-tags must be lowercase, got '{}'",
                tag
            )));
        }
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    Url::parse(&config.contact_url).map_err(|e| {
        ConfigError::Validation(format!("invalid contact-url '{}': {}", config.contact_url, e))
    })?;

    Ok(())
}
