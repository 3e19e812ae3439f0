use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, VersionConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the request rate; the source site is a shared public resource
const MAX_REQUESTS_PER_SECOND: f64 = 100.0;

/// Lower bound on the request rate: one request every 100 seconds
const MIN_REQUESTS_PER_SECOND: f64 = 0.01;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_version_config(&config.version)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !config.requests_per_second.is_finite()
        || config.requests_per_second < MIN_REQUESTS_PER_SECOND
        || config.requests_per_second > MAX_REQUESTS_PER_SECOND
    {
        return Err(ConfigError::Validation(format!(
            "requests_per_second must be between {} and {}, got {}",
            MIN_REQUESTS_PER_SECOND, MAX_REQUESTS_PER_SECOND, config.requests_per_second
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates a corpus version code such as `GAE`
pub fn validate_version_code(code: &str) -> Result<(), ConfigError> {
    if code.is_empty() {
        return Err(ConfigError::Validation(
            "version code cannot be empty".to_string(),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "version code must be alphanumeric, got '{}'",
            code
        )));
    }

    Ok(())
}

/// Validates the corpus version section
fn validate_version_config(config: &VersionConfig) -> Result<(), ConfigError> {
    validate_version_code(&config.code)?;

    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "version name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
