//! Slack Web API transport shared by every command.

use crate::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Slack configuration: environment first, command line overrides on top
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub api_base: String,
    pub token: String,
}

impl SlackConfig {
    /// Default Slack Web API base URL
    pub const DEFAULT_API_BASE: &'static str = "https://slack.com/api";

    /// Load configuration from environment variables
    /// Uses SLACK_TOKEN, left empty when unset so an override can still supply it
    /// Uses SLACK_API_BASE with default fallback
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("SLACK_API_BASE")
                .unwrap_or_else(|_| Self::DEFAULT_API_BASE.to_string()),
            token: std::env::var("SLACK_TOKEN").unwrap_or_default(),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, api_base: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = api_base {
            self.api_base = url;
        }
        if let Some(token) = token {
            self.token = token;
        }
        self
    }

    /// Rejects a configuration without a usable token
    pub fn validated(self) -> Result<Self, Error> {
        if self.token.trim().is_empty() {
            return Err(Error::MissingConfig(
                "Slack token not set; pass --token or set SLACK_TOKEN".to_string(),
            ));
        }
        Ok(self)
    }

    /// Build configuration from the environment and the global options
    pub fn from_global(global: &crate::Global) -> Result<Self, Error> {
        Self::from_env()
            .with_overrides(global.api_base.clone(), global.token.clone())
            .validated()
    }
}

/// Create an HTTP client sending the token as a Bearer credential
pub fn create_authenticated_client(config: &SlackConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("sleuth/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Authenticated Slack Web API client
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
}

impl SlackClient {
    pub fn new(config: &SlackConfig) -> Result<Self> {
        Ok(Self {
            http: create_authenticated_client(config)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }
}

/// Boxed transport failure: network, HTTP status or body decoding
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Answers Slack Web API method calls.
///
/// Only transport problems are errors here. An `ok: false` answer is a successfully decoded
/// body.
pub trait SlackApi {
    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = Result<T, TransportError>>;
}

impl SlackApi for SlackClient {
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, TransportError> {
        let url = self.method_url(method);
        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

/// Spinner on stderr, hidden when progress output is unwanted
pub fn spinner(visible: bool, msg: &str) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(msg.to_string());

    Ok(spinner)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn global(token: Option<&str>, api_base: Option<&str>) -> crate::Global {
        crate::Global {
            token: token.map(str::to_string),
            api_base: api_base.map(str::to_string),
            verbose: false,
        }
    }

    fn config(token: &str) -> SlackConfig {
        SlackConfig {
            api_base: SlackConfig::DEFAULT_API_BASE.to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn test_config_requires_token() {
        let err = config("").validated().unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));
        assert!(config("  ").validated().is_err());
        assert!(config("xoxb-1").validated().is_ok());
    }

    #[test]
    fn test_with_overrides_replaces_only_given_values() {
        let config = config("xoxb-env").with_overrides(None, Some("xoxb-cli".to_string()));
        assert_eq!(config.api_base, "https://slack.com/api");
        assert_eq!(config.token, "xoxb-cli");

        let config = config.with_overrides(Some("http://localhost:9000/api".to_string()), None);
        assert_eq!(config.api_base, "http://localhost:9000/api");
        assert_eq!(config.token, "xoxb-cli");
    }

    #[test]
    fn test_cli_token_wins_over_environment() {
        let config = SlackConfig::from_env()
            .with_overrides(
                Some("http://localhost:9000/api".to_string()),
                Some("xoxb-cli".to_string()),
            )
            .validated()
            .unwrap();
        assert_eq!(config.api_base, "http://localhost:9000/api");
        assert_eq!(config.token, "xoxb-cli");
    }

    #[test]
    fn test_from_global_uses_options() {
        let config =
            SlackConfig::from_global(&global(Some("xoxb-1"), Some("http://localhost:9000/api/")))
                .unwrap();
        assert_eq!(config.token, "xoxb-1");
        assert_eq!(config.api_base, "http://localhost:9000/api/");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config =
            SlackConfig::from_global(&global(Some("xoxb-1"), Some("http://localhost:9000/api/")))
                .unwrap();
        let client = SlackClient::new(&config).unwrap();
        assert_eq!(
            client.method_url("users.info"),
            "http://localhost:9000/api/users.info"
        );
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        assert!(create_authenticated_client(&config("bad\ntoken")).is_err());
    }
}
