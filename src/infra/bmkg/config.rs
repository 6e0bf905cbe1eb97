use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://bmkgsatu.bmkg.go.id/db/bmkgsatu";
pub const DEFAULT_PAGE_SIZE: usize = 10_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Connection settings for the BMKG search API.
///
/// Read from the environment (a `.env` file is loaded first by the CLI):
///
/// | Variable            | Required | Default                  |
/// |---------------------|----------|--------------------------|
/// | `BMKG_USERNAME`     | yes      |                          |
/// | `BMKG_PASSWORD`     | yes      |                          |
/// | `BMKG_BASE_URL`     | no       | [`DEFAULT_BASE_URL`]     |
/// | `BMKG_PAGE_SIZE`    | no       | [`DEFAULT_PAGE_SIZE`]    |
/// | `BMKG_TIMEOUT_SECS` | no       | [`DEFAULT_TIMEOUT_SECS`] |
#[derive(Clone)]
pub struct BmkgConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub page_size: usize,
    pub timeout: Duration,
}

impl fmt::Debug for BmkgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BmkgConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BmkgConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let base_url = lookup("BMKG_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).with_context(|| format!("BMKG_BASE_URL is not a URL: {base_url}"))?;

        let page_size = match lookup("BMKG_PAGE_SIZE") {
            Some(v) => v
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("BMKG_PAGE_SIZE must be a positive integer, got {v}"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match lookup("BMKG_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("BMKG_TIMEOUT_SECS must be a number of seconds, got {v}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: required("BMKG_USERNAME")?,
            password: required("BMKG_PASSWORD")?,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Resolves `path` below the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse(&url).with_context(|| format!("invalid endpoint URL: {url}"))
    }

    /// The search URL for one page of results.
    pub fn search_url(&self, params: &[(&str, String)], size: usize, offset: usize) -> Result<Url> {
        // the search endpoint sits behind an empty path segment
        let mut url = self.endpoint("/@search")?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("_size", &size.to_string())
            .append_pair("_from", &offset.to_string());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = BmkgConfig::from_lookup(lookup_from(&[
            ("BMKG_USERNAME", "user"),
            ("BMKG_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = BmkgConfig::from_lookup(lookup_from(&[("BMKG_USERNAME", "user")])).unwrap_err();
        assert!(err.to_string().contains("BMKG_PASSWORD"));

        assert!(
            BmkgConfig::from_lookup(lookup_from(&[
                ("BMKG_USERNAME", ""),
                ("BMKG_PASSWORD", "secret"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let base = [("BMKG_USERNAME", "user"), ("BMKG_PASSWORD", "secret")];

        for (key, value) in [
            ("BMKG_PAGE_SIZE", "0"),
            ("BMKG_PAGE_SIZE", "many"),
            ("BMKG_TIMEOUT_SECS", "-1"),
            ("BMKG_BASE_URL", "not a url"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push((key, value));
            assert!(BmkgConfig::from_lookup(lookup_from(&pairs)).is_err(), "{key}={value}");
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = BmkgConfig::from_lookup(lookup_from(&[
            ("BMKG_USERNAME", "user"),
            ("BMKG_PASSWORD", "hunter2"),
        ]))
        .unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_endpoints() {
        let config = BmkgConfig::from_lookup(lookup_from(&[
            ("BMKG_USERNAME", "user"),
            ("BMKG_PASSWORD", "secret"),
            ("BMKG_BASE_URL", "https://example.test/db/root/"),
        ]))
        .unwrap();

        assert_eq!(
            config.endpoint("@login").unwrap().as_str(),
            "https://example.test/db/root/@login"
        );

        let url = config
            .search_url(&[("type_name", "GTSMessage".to_string())], 100, 200)
            .unwrap();
        assert_eq!(url.path(), "/db/root//@search");
        assert_eq!(url.query(), Some("type_name=GTSMessage&_size=100&_from=200"));
    }
}
