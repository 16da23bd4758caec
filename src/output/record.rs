//! Sitemap records
//!
//! A record is one `<url>` entry of the sitemap. Records are built from
//! [`RecordParams`], which mirrors the loosely-typed parameter set callers
//! collect while crawling; building fails if the location is missing.

use crate::output::{OutputError, OutputResult};
use std::fmt;

/// Priority recorded for pages that could not be fetched
pub const UNREACHABLE_PRIORITY: &str = "0.0";

/// How often a URL is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Daily,
    Never,
}

impl ChangeFrequency {
    /// The value written into `<changefreq>`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw parameters for a sitemap record
///
/// Every field is optional here; [`SitemapRecord::from_params`] enforces
/// which ones are actually required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordParams {
    /// Value for `<loc>`; required
    pub location: Option<String>,

    /// Value for `<changefreq>`; defaults to daily
    pub change_frequency: Option<ChangeFrequency>,

    /// Value for `<priority>`; omitted when `None`
    pub priority: Option<String>,
}

impl RecordParams {
    /// Parameters for the given location with every other field unset
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    /// Sets the change frequency
    pub fn change_frequency(mut self, frequency: ChangeFrequency) -> Self {
        self.change_frequency = Some(frequency);
        self
    }

    /// Sets the priority
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// One `<url>` entry of the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRecord {
    location: String,
    change_frequency: ChangeFrequency,
    priority: Option<String>,
    valid: bool,
}

impl SitemapRecord {
    /// Builds a record from raw parameters
    ///
    /// # Errors
    ///
    /// * `OutputError::MissingLocation` - `location` is `None` or blank
    /// * `OutputError::InvalidPriority` - `priority` is not a decimal in `0.0..=1.0`
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_sitemap::output::{OutputError, RecordParams, SitemapRecord};
    ///
    /// let record = SitemapRecord::from_params(RecordParams::at("https://example.com"), true).unwrap();
    /// assert_eq!(record.change_frequency().as_str(), "daily");
    ///
    /// let missing = SitemapRecord::from_params(RecordParams::default(), true);
    /// assert!(matches!(missing, Err(OutputError::MissingLocation)));
    /// ```
    pub fn from_params(params: RecordParams, valid: bool) -> OutputResult<Self> {
        let location = match params.location {
            Some(location) if !location.trim().is_empty() => location,
            _ => return Err(OutputError::MissingLocation),
        };

        if let Some(priority) = &params.priority {
            validate_priority(priority)?;
        }

        Ok(Self {
            location,
            change_frequency: params.change_frequency.unwrap_or(ChangeFrequency::Daily),
            priority: params.priority,
            valid,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn change_frequency(&self) -> ChangeFrequency {
        self.change_frequency
    }

    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// False for URLs that could not be fetched
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

fn validate_priority(priority: &str) -> OutputResult<()> {
    match priority.trim().parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(()),
        _ => Err(OutputError::InvalidPriority(priority.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_location_rejected() {
        let params = RecordParams {
            location: None,
            change_frequency: Some(ChangeFrequency::Daily),
            priority: None,
        };
        let result = SitemapRecord::from_params(params, true);
        assert!(matches!(result, Err(OutputError::MissingLocation)));
    }

    #[test]
    fn test_blank_location_rejected() {
        let result = SitemapRecord::from_params(RecordParams::at("  "), true);
        assert!(matches!(result, Err(OutputError::MissingLocation)));
    }

    #[test]
    fn test_defaults_to_daily() {
        let record =
            SitemapRecord::from_params(RecordParams::at("https://example.com/about"), true)
                .unwrap();
        assert_eq!(record.location(), "https://example.com/about");
        assert_eq!(record.change_frequency(), ChangeFrequency::Daily);
        assert_eq!(record.priority(), None);
        assert!(record.is_valid());
    }

    #[test]
    fn test_unreachable_record() {
        let params = RecordParams::at("https://example.com/gone")
            .change_frequency(ChangeFrequency::Never)
            .priority(UNREACHABLE_PRIORITY);
        let record = SitemapRecord::from_params(params, false).unwrap();
        assert_eq!(record.change_frequency(), ChangeFrequency::Never);
        assert_eq!(record.priority(), Some("0.0"));
        assert!(!record.is_valid());
    }

    #[test]
    fn test_priority_validation() {
        for ok in ["0.0", "0.8", "1.0", "0.25"] {
            let params = RecordParams::at("https://example.com").priority(ok);
            assert!(SitemapRecord::from_params(params, true).is_ok(), "{}", ok);
        }

        for bad in ["1.5", "-0.1", "high", ""] {
            let params = RecordParams::at("https://example.com").priority(bad);
            assert!(
                matches!(
                    SitemapRecord::from_params(params, true),
                    Err(OutputError::InvalidPriority(_))
                ),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_change_frequency_display() {
        assert_eq!(ChangeFrequency::Daily.to_string(), "daily");
        assert_eq!(ChangeFrequency::Never.to_string(), "never");
    }
}
