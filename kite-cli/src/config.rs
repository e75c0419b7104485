//! Configuration module
//!
//! Handles CLI configuration including credentials and the state file location.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kite_reconciler::{PipelineReconciler, ProviderConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization given on the command line, if any
    pub organization: Option<String>,
    /// API token given on the command line, if any
    pub api_token: Option<String>,
    /// API root (e.g., "https://api.buildkite.com/v2")
    pub api_url: String,
    /// Path of the JSON state file
    pub state_path: PathBuf,
}

impl Config {
    /// Resolve credentials and build a reconciler
    ///
    /// Command-line values take precedence over the environment.
    pub fn reconciler(&self) -> Result<PipelineReconciler> {
        let provider = ProviderConfig::resolve(self.organization.clone(), self.api_token.clone())
            .context("Failed to resolve provider configuration")?
            .with_api_url(self.api_url.clone());

        PipelineReconciler::from_config(&provider).context("Failed to create Buildkite client")
    }
}
