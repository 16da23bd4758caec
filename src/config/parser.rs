use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
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
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_sitemap::config::load_config;
///
/// let config = load_config(Path::new("sitemap.toml")).unwrap();
/// println!("Output: {}.xml", config.output.file_name);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// Used when command-line flags still have to be merged in before the
/// result can be validated.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Parses a `Name: value` header argument
///
/// # Example
///
/// ```
/// use sumi_sitemap::config::parse_header;
///
/// let (name, value) = parse_header("Accept-Language: en-GB").unwrap();
/// assert_eq!(name, "Accept-Language");
/// assert_eq!(value, "en-GB");
/// assert!(parse_header("no separator").is_err());
/// ```
pub fn parse_header(arg: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = arg.split_once(':').ok_or_else(|| {
        ConfigError::InvalidHeader(format!("expected 'Name: value', got '{}'", arg))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidHeader(format!(
            "missing header name in '{}'",
            arg
        )));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NamespaceStyle;
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
[site]
homepage = "https://ncdc.gov.ng"

[crawler]
max-concurrent-fetches = 8
request-timeout-secs = 10
crawl-timeout-secs = 600
max-pages = 5000
max-frontier = 20000

[headers]
User-Agent = "SitemapBot/1.0"
Accept-Language = "en"

[output]
file-name = "ncdc"
directory = "out"
namespace = "sitemaps-org"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.homepage, "https://ncdc.gov.ng");
        assert_eq!(config.crawler.max_concurrent_fetches, 8);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.crawl_timeout_secs, Some(600));
        assert_eq!(config.crawler.max_pages, Some(5000));
        assert_eq!(config.crawler.max_frontier, 20000);
        assert_eq!(config.headers.len(), 2);
        assert_eq!(config.output.file_name, "ncdc");
        assert_eq!(config.output.directory.as_deref(), Some("out"));
        assert_eq!(config.output.namespace, NamespaceStyle::SitemapsOrg);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let file = create_temp_config("[site]\nhomepage = \"https://example.com\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_fetches, 4);
        assert_eq!(config.output.file_name, "sitemap");
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_headers_must_be_a_table() {
        let config_content = r#"
headers = "User-Agent: test"

[site]
homepage = "https://example.com"
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sitemap.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[site]
homepage = "https://example.com"

[crawler]
max-concurrent-fetches = 0
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_read_config_skips_validation() {
        let file = create_temp_config("[output]\nfile-name = \"custom\"\n");
        let config = read_config(file.path()).unwrap();
        assert!(config.site.homepage.is_empty());
        assert_eq!(config.output.file_name, "custom");
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

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("User-Agent: Mozilla/5.0 (X11; Linux)").unwrap();
        assert_eq!(name, "User-Agent");
        assert_eq!(value, "Mozilla/5.0 (X11; Linux)");

        let (name, value) = parse_header("X-Empty:").unwrap();
        assert_eq!(name, "X-Empty");
        assert_eq!(value, "");

        assert!(matches!(
            parse_header("NoColon"),
            Err(ConfigError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header(": value"),
            Err(ConfigError::InvalidHeader(_))
        ));
    }
}
