use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the fetch budget
const MAX_CONCURRENT_FETCHES: u32 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json-path cannot be empty".to_string(),
        ));
    }

    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation("csv-path cannot be empty".to_string()));
    }

    if config.json_path == config.csv_path {
        return Err(ConfigError::Validation(format!(
            "json-path and csv-path must differ, both are '{}'",
            config.json_path
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut site = SiteConfig::default();
        assert!(validate_site_config(&site).is_ok());

        site.base_url = "not a url".to_string();
        assert!(matches!(
            validate_site_config(&site),
            Err(ConfigError::InvalidUrl(_))
        ));

        site.base_url = "ftp://example.com/".to_string();
        assert!(validate_site_config(&site).is_err());
    }

    #[test]
    fn test_validate_fetch_budget_bounds() {
        let mut crawler = CrawlerConfig::default();

        crawler.max_concurrent_fetches = 1;
        assert!(validate_crawler_config(&crawler).is_ok());

        crawler.max_concurrent_fetches = MAX_CONCURRENT_FETCHES;
        assert!(validate_crawler_config(&crawler).is_ok());

        crawler.max_concurrent_fetches = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_concurrent_fetches = MAX_CONCURRENT_FETCHES + 1;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_timeouts() {
        let mut crawler = CrawlerConfig::default();
        crawler.request_timeout_secs = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        let mut crawler = CrawlerConfig::default();
        crawler.connect_timeout_secs = 0;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut agent = UserAgentConfig::default();
        assert!(validate_user_agent_config(&agent).is_ok());

        agent.crawler_name = String::new();
        assert!(validate_user_agent_config(&agent).is_err());

        agent.crawler_name = "bad name/1".to_string();
        assert!(validate_user_agent_config(&agent).is_err());
    }

    #[test]
    fn test_output_paths_must_differ() {
        let output = OutputConfig {
            json_path: "words.out".to_string(),
            csv_path: "words.out".to_string(),
        };
        assert!(validate_output_config(&output).is_err());

        let output = OutputConfig {
            json_path: String::new(),
            csv_path: "words.csv".to_string(),
        };
        assert!(validate_output_config(&output).is_err());
    }
}
