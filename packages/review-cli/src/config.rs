//! Configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first if present.
//! Command-line flags override anything set here.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use review_api_client::{ClientOptions, PendingQuery};
use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub page_offset: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_url: lookup("REVIEW_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout_secs: parse_or(&lookup, "REVIEW_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
                .context("REVIEW_API_TIMEOUT_SECS must be a whole number of seconds")?,
            page_size: parse_or(&lookup, "REVIEW_PAGE_SIZE", DEFAULT_PAGE_SIZE)
                .context("REVIEW_PAGE_SIZE must be a valid number")?,
            page_offset: parse_or(&lookup, "REVIEW_PAGE_OFFSET", 0)
                .context("REVIEW_PAGE_OFFSET must be a valid number")?,
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn pending_query(&self) -> PendingQuery {
        PendingQuery {
            limit: self.page_size,
            offset: self.page_offset,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.pending_query(), PendingQuery::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("REVIEW_API_URL", "https://review.example.org/api"),
            ("REVIEW_API_TIMEOUT_SECS", "30"),
            ("REVIEW_PAGE_SIZE", " 20 "),
            ("REVIEW_PAGE_OFFSET", "40"),
        ]))
        .unwrap();

        assert_eq!(config.client_options().base_url, "https://review.example.org/api");
        assert_eq!(config.client_options().timeout, Duration::from_secs(30));
        assert_eq!(
            config.pending_query(),
            PendingQuery {
                limit: 20,
                offset: 40
            }
        );
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = Config::from_lookup(lookup(&[("REVIEW_PAGE_SIZE", "lots")])).unwrap_err();
        assert!(err.to_string().contains("REVIEW_PAGE_SIZE"));
    }
}
