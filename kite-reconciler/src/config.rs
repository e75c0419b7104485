//! Provider configuration
//!
//! Organization, API token and API root used to build the client. Explicit
//! values win over environment variables.

use std::fmt;

use url::Url;

use crate::error::{ReconcileError, Result};

/// Default Buildkite REST API root
pub const DEFAULT_API_URL: &str = "https://api.buildkite.com/v2";

/// Environment variable holding the organization slug
pub const ORGANIZATION_ENV: &str = "BUILDKITE_ORGANIZATION";

/// Environment variable holding the API token
pub const API_TOKEN_ENV: &str = "BUILDKITE_API_TOKEN";

/// Environment variable overriding the API root
pub const API_URL_ENV: &str = "BUILDKITE_API_URL";

/// Provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// Organization slug the pipelines belong to
    pub organization: String,

    /// API access token
    pub api_token: String,

    /// API root without the organization (e.g., "https://api.buildkite.com/v2")
    pub api_url: String,
}

impl ProviderConfig {
    /// Creates a new configuration against the default API root
    pub fn new(organization: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            api_token: api_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BUILDKITE_ORGANIZATION (required)
    /// - BUILDKITE_API_TOKEN (required)
    /// - BUILDKITE_API_URL (optional, default: https://api.buildkite.com/v2)
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None)
    }

    /// Creates configuration from explicit values, falling back to the environment
    ///
    /// An explicit `Some` always takes precedence over the corresponding
    /// environment variable. Empty values count as unset.
    pub fn resolve(organization: Option<String>, api_token: Option<String>) -> Result<Self> {
        let organization = non_empty(organization)
            .or_else(|| env_var(ORGANIZATION_ENV))
            .ok_or_else(|| {
                ReconcileError::Configuration(format!(
                    "organization is not set; pass it explicitly or set {}",
                    ORGANIZATION_ENV
                ))
            })?;

        let api_token = non_empty(api_token)
            .or_else(|| env_var(API_TOKEN_ENV))
            .ok_or_else(|| {
                ReconcileError::Configuration(format!(
                    "API token is not set; pass it explicitly or set {}",
                    API_TOKEN_ENV
                ))
            })?;

        let api_url = env_var(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            organization,
            api_token,
            api_url,
        })
    }

    /// Overrides the API root
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.organization.is_empty() {
            return Err(ReconcileError::Configuration(
                "organization cannot be empty".to_string(),
            ));
        }

        if self.organization.contains('/') {
            return Err(ReconcileError::Configuration(format!(
                "organization '{}' must be a slug, not a path",
                self.organization
            )));
        }

        if self.api_token.is_empty() {
            return Err(ReconcileError::Configuration(
                "api_token cannot be empty".to_string(),
            ));
        }

        let url = Url::parse(&self.api_url).map_err(|e| {
            ReconcileError::Configuration(format!("invalid api_url '{}': {}", self.api_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ReconcileError::Configuration(
                "api_url must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Organization-scoped API root every pipeline path is resolved against
    pub fn organization_url(&self) -> String {
        format!(
            "{}/organizations/{}/",
            self.api_url.trim_end_matches('/'),
            self.organization
        )
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("organization", &self.organization)
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_url() {
        let config = ProviderConfig::new("acme", "token");
        assert_eq!(
            config.organization_url(),
            "https://api.buildkite.com/v2/organizations/acme/"
        );

        let config = config.with_api_url("http://localhost:9000/v2/");
        assert_eq!(
            config.organization_url(),
            "http://localhost:9000/v2/organizations/acme/"
        );
    }

    #[test]
    fn test_resolve_from_env() {
        temp_env::with_vars(
            [
                (ORGANIZATION_ENV, Some("env-org")),
                (API_TOKEN_ENV, Some("env-token")),
                (API_URL_ENV, None),
            ],
            || {
                let config = ProviderConfig::from_env().unwrap();
                assert_eq!(config.organization, "env-org");
                assert_eq!(config.api_token, "env-token");
                assert_eq!(config.api_url, DEFAULT_API_URL);
            },
        );
    }

    #[test]
    fn test_explicit_values_take_precedence() {
        temp_env::with_vars(
            [
                (ORGANIZATION_ENV, Some("env-org")),
                (API_TOKEN_ENV, Some("env-token")),
                (API_URL_ENV, Some("http://localhost:9000/v2")),
            ],
            || {
                let config = ProviderConfig::resolve(
                    Some("explicit-org".to_string()),
                    Some("explicit-token".to_string()),
                )
                .unwrap();
                assert_eq!(config.organization, "explicit-org");
                assert_eq!(config.api_token, "explicit-token");
                assert_eq!(config.api_url, "http://localhost:9000/v2");
            },
        );
    }

    #[test]
    fn test_missing_values_are_configuration_errors() {
        temp_env::with_vars(
            [(ORGANIZATION_ENV, None::<&str>), (API_TOKEN_ENV, None)],
            || {
                let err = ProviderConfig::resolve(None, Some("token".to_string())).unwrap_err();
                assert!(matches!(err, ReconcileError::Configuration(_)));

                let err = ProviderConfig::resolve(Some("acme".to_string()), None).unwrap_err();
                assert!(err.to_string().contains(API_TOKEN_ENV));
            },
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProviderConfig::new("acme", "token");
        assert!(config.validate().is_ok());

        config.organization = String::new();
        assert!(config.validate().is_err());

        config.organization = "acme/other".to_string();
        assert!(config.validate().is_err());

        config.organization = "acme".to_string();
        config.api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_url = DEFAULT_API_URL.to_string();
        config.api_token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ProviderConfig::new("acme", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("acme"));
    }
}
