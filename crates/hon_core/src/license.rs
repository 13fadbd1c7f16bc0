//! License text lookup.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

/// Raw SPDX license text, `{license}` is replaced by the identifier.
pub const LICENSE_URL: &str =
    "https://raw.githubusercontent.com/spdx/license-list-data/master/text/{license}.txt";

/// Source of full license texts by SPDX identifier.
#[async_trait]
pub trait LicenseSource: Send + Sync {
    /// Fetch the text for `license`, failing with [`CoreError::UnknownLicense`].
    async fn fetch(&self, license: &str) -> CoreResult<String>;
}

/// Fetches license texts from the SPDX license list on GitHub.
#[derive(Debug, Clone)]
pub struct SpdxLicenseSource {
    client: reqwest::Client,
    url_template: String,
}

impl SpdxLicenseSource {
    pub fn new() -> Self {
        Self::with_url_template(LICENSE_URL)
    }

    /// Use a different URL; `{license}` is replaced by the identifier.
    pub fn with_url_template(url_template: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template: url_template.into(),
        }
    }

    /// URL for `license`, or `None` if it is not a plausible SPDX identifier.
    pub fn url_for(&self, license: &str) -> Option<String> {
        if !is_spdx_id(license) {
            return None;
        }
        Some(self.url_template.replace("{license}", license))
    }
}

impl Default for SpdxLicenseSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LicenseSource for SpdxLicenseSource {
    async fn fetch(&self, license: &str) -> CoreResult<String> {
        let unknown = || CoreError::UnknownLicense(license.to_string());
        let url = self.url_for(license).ok_or_else(unknown)?;
        debug!("Fetching license {} from {}", license, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("License request failed: {}", e);
            unknown()
        })?;

        if !response.status().is_success() {
            debug!("SPDX returned status {} for {}", response.status(), license);
            return Err(unknown());
        }

        response.text().await.map_err(|e| {
            warn!("Failed to read license body: {}", e);
            unknown()
        })
    }
}

/// SPDX identifiers are letters, digits, `.`, `-` and `+`.
fn is_spdx_id(license: &str) -> bool {
    !license.is_empty()
        && !license.starts_with('.')
        && license
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let source = SpdxLicenseSource::new();
        assert_eq!(
            source.url_for("Apache-2.0").as_deref(),
            Some("https://raw.githubusercontent.com/spdx/license-list-data/master/text/Apache-2.0.txt")
        );
        assert_eq!(
            source.url_for("GPL-2.0+").as_deref(),
            Some("https://raw.githubusercontent.com/spdx/license-list-data/master/text/GPL-2.0+.txt")
        );
    }

    #[test]
    fn test_rejects_non_identifiers() {
        let source = SpdxLicenseSource::new();
        assert!(source.url_for("").is_none());
        assert!(source.url_for("../secrets").is_none());
        assert!(source.url_for("MIT License").is_none());
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_unknown() {
        let source = SpdxLicenseSource::with_url_template("http://127.0.0.1:9/{license}.txt");
        let err = source.fetch("not a license").await.unwrap_err();
        assert!(matches!(err, CoreError::UnknownLicense(id) if id == "not a license"));
    }

    #[tokio::test]
    async fn test_unreachable_source_is_unknown() {
        let source = SpdxLicenseSource::with_url_template("http://127.0.0.1:9/{license}.txt");
        let err = source.fetch("MIT").await.unwrap_err();
        assert!(matches!(err, CoreError::UnknownLicense(id) if id == "MIT"));
    }
}
