//! Kite HTTP Client
//!
//! A small JSON-over-HTTP client for the Buildkite REST API.
//!
//! Every request is resolved against an organization-scoped base URL fixed at
//! construction and carries a bearer token. Responses are classified into
//! [`ClientError`] variants so callers can special-case a missing resource.
//!
//! # Example
//!
//! ```no_run
//! use kite_client::ApiClient;
//! use kite_core::domain::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new(
//!         "https://api.buildkite.com/v2/organizations/acme/",
//!         "my-token",
//!     )?;
//!
//!     let pipeline: Pipeline = client.get(&["pipelines", "my-pipeline"]).await?;
//!     println!("Pipeline: {}", pipeline.web_url);
//!     Ok(())
//! }
//! ```

pub mod error;
mod pipelines;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Value of the `User-Agent` header sent with every request
pub const USER_AGENT_VALUE: &str = concat!("kite/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Buildkite REST API
///
/// Holds no per-call state, so one instance can be cloned or shared across
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Organization-scoped API root, always ending in `/`
    base_url: Url,
    /// Bearer token sent in the `Authorization` header
    api_token: String,
    /// HTTP client instance
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - Organization-scoped API root
    ///   (e.g., "https://api.buildkite.com/v2/organizations/acme/")
    /// * `api_token` - API access token
    ///
    /// # Errors
    /// Returns [`ClientError::Configuration`] if `base_url` is not a valid base URL.
    ///
    /// # Example
    /// ```
    /// use kite_client::ApiClient;
    ///
    /// let client =
    ///     ApiClient::new("https://api.buildkite.com/v2/organizations/acme", "token").unwrap();
    /// assert_eq!(
    ///     client.base_url().as_str(),
    ///     "https://api.buildkite.com/v2/organizations/acme/"
    /// );
    /// ```
    pub fn new(base_url: &str, api_token: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, api_token, Client::new())
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - Organization-scoped API root
    /// * `api_token` - API access token
    /// * `client` - A configured reqwest Client
    pub fn with_client(
        base_url: &str,
        api_token: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base URL '{}' cannot be used as a base",
                base_url
            )));
        }

        // Base path always ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            api_token: api_token.into(),
            client,
        })
    }

    /// Get the base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL
    ///
    /// Each segment is appended as exactly one percent-encoded path segment,
    /// so `/`, `?` and `#` inside a slug never change the resource addressed.
    ///
    /// # Errors
    /// Returns [`ClientError::Configuration`] for an empty, `.` or `..` segment.
    pub fn resolve(&self, path: &[&str]) -> Result<Url> {
        if let Some(segment) = path
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ClientError::Configuration(format!(
                "invalid path segment '{}' in {:?}",
                segment, path
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!(
                    "base URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(path);

        Ok(url)
    }

    // =============================================================================
    // JSON Verbs
    // =============================================================================

    /// GET a resource and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let body = self.execute(Method::GET, path, None::<&()>).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, path: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::POST, path, Some(body)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put<B, T>(&self, path: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::PUT, path, Some(body)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// PATCH a JSON body and decode the JSON response
    pub async fn patch<B, T>(&self, path: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::PATCH, path, Some(body)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// DELETE a resource, ignoring any response body
    pub async fn delete(&self, path: &[&str]) -> Result<()> {
        self.execute(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    // =============================================================================
    // Request Execution
    // =============================================================================

    /// Send one request and return the raw body of a successful response
    ///
    /// 404 becomes [`ClientError::NotFound`], any other status outside
    /// `200..300` becomes [`ClientError::Remote`].
    async fn execute<B>(&self, method: Method, path: &[&str], body: Option<&B>) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.api_token)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)?;
            debug!(body = %String::from_utf8_lossy(&bytes), "Buildkite request body");
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        debug!(%method, %url, "Buildkite request");
        let response = request.send().await?;
        let status = response.status();
        debug!(%method, %url, %status, "Buildkite response");

        let bytes = response.bytes().await?;
        debug!(body = %String::from_utf8_lossy(&bytes), "Buildkite response body");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::remote(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            ApiClient::new("https://api.buildkite.com/v2/organizations/acme/", "token").unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://api.buildkite.com/v2/organizations/acme/"
        );
    }

    #[test]
    fn test_client_appends_trailing_slash() {
        let client =
            ApiClient::new("https://api.buildkite.com/v2/organizations/acme", "token").unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://api.buildkite.com/v2/organizations/acme/"
        );
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let err = ApiClient::new("not a url", "token").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_client_rejects_non_base_url() {
        let err = ApiClient::new("mailto:ops@example.com", "token").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_resolve_joins_segments() {
        let client =
            ApiClient::new("https://api.buildkite.com/v2/organizations/acme/", "token").unwrap();
        let url = client.resolve(&["pipelines", "my-pipeline"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.buildkite.com/v2/organizations/acme/pipelines/my-pipeline"
        );
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = ApiClient::with_client(
            "https://api.buildkite.com/v2/organizations/acme/",
            "token",
            http_client,
        )
        .unwrap();
        assert_eq!(
            client.resolve(&["pipelines"]).unwrap().path(),
            "/v2/organizations/acme/pipelines"
        );
    }

    fn acme() -> ApiClient {
        ApiClient::new("https://api.buildkite.com/v2/organizations/acme/", "token").unwrap()
    }

    #[test]
    fn test_resolve_encodes_fragment_and_query_characters() {
        let client = acme();
        assert_eq!(
            client.resolve(&["pipelines", "a#b"]).unwrap().as_str(),
            "https://api.buildkite.com/v2/organizations/acme/pipelines/a%23b"
        );

        let url = client.resolve(&["pipelines", "a?x=1"]).unwrap();
        assert_eq!(url.path(), "/v2/organizations/acme/pipelines/a%3Fx=1");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_resolve_keeps_slashes_inside_one_segment() {
        let client = acme();

        let url = client.resolve(&["pipelines", "../../other"]).unwrap();
        assert_eq!(url.path(), "/v2/organizations/acme/pipelines/..%2F..%2Fother");

        let url = client.resolve(&["pipelines", "team/app"]).unwrap();
        assert_eq!(url.path(), "/v2/organizations/acme/pipelines/team%2Fapp");
    }

    #[test]
    fn test_resolve_rejects_empty_and_dot_segments() {
        let client = acme();
        for slug in ["", ".", ".."] {
            let err = client.resolve(&["pipelines", slug]).unwrap_err();
            assert!(
                matches!(err, ClientError::Configuration(_)),
                "slug {slug:?} should be rejected"
            );
        }
    }
}
