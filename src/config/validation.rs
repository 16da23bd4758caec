use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::crawler::build_header_map;
use crate::url::Site;
use crate::ConfigError;
use std::collections::BTreeMap;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_headers(&config.headers)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the homepage
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.homepage.trim().is_empty() {
        return Err(ConfigError::Validation(
            "homepage cannot be empty".to_string(),
        ));
    }

    Site::new(&config.homepage)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid homepage: {}", e)))?;

    // Root-relative links are prefixed with the whole homepage, so a
    // homepage below the site root produces links under that path.
    if let Ok(url) = Url::parse(config.homepage.trim()) {
        if url.path() != "/" {
            tracing::warn!(
                "Homepage {} is not a site root; root-relative links will be prefixed with it",
                config.homepage
            );
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.crawl_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_frontier < 1 {
        return Err(ConfigError::Validation(format!(
            "max_frontier must be >= 1, got {}",
            config.max_frontier
        )));
    }

    Ok(())
}

/// Validates that every header is a legal HTTP header name/value pair
fn validate_headers(headers: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    build_header_map(headers).map(|_| ())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file_name cannot be empty".to_string(),
        ));
    }

    if config.file_name.contains('/') || config.file_name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "file_name must not contain path separators, got '{}'; use directory instead",
            config.file_name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::for_homepage("https://example.com")
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_homepage_required() {
        let config = Config::default();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_homepage() {
        let config = Config::for_homepage("example.com");
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        let config = Config::for_homepage("ftp://example.com");
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = valid_config();
        config.crawler.max_concurrent_fetches = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = 101;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = valid_config();
        config.crawler.max_pages = Some(0);
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.crawl_timeout_secs = Some(0);
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.request_timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.crawler.max_frontier = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_header_name() {
        let mut config = valid_config();
        config
            .headers
            .insert("Bad Header".to_string(), "value".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut config = valid_config();
        config
            .headers
            .insert("X-Test".to_string(), "line\nbreak".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_output_file_name() {
        let mut config = valid_config();
        config.output.file_name = String::new();
        assert!(validate(&config).is_err());

        config.output.file_name = "out/sitemap".to_string();
        assert!(validate(&config).is_err());
    }
}
