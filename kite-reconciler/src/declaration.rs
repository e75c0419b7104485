//! Pipeline declarations
//!
//! A [`PipelineDeclaration`] is the caller's desired state. Optional fields use
//! `Option` so "explicitly set" and "left unset" stay distinguishable all the
//! way to the request payload.

use std::collections::BTreeMap;

use kite_core::domain::provider::{BitbucketSettings, GitHubSettings};
use kite_core::domain::step::Step;
use kite_core::dto::pipeline::{PipelineRequest, ProviderSettings};
use serde::Deserialize;
use tracing::warn;

use crate::error::{ReconcileError, Result};

/// Branch used when the declaration does not name one
pub const DEFAULT_BRANCH: &str = "master";

/// Desired state of a pipeline as declared by the caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PipelineDeclaration {
    pub name: String,
    /// Source-control URL, e.g. "git@github.com:org/repo.git"
    pub repository: String,
    /// Requested slug; the server derives one from the name when unset
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub branch_configuration: Option<String>,
    #[serde(default)]
    pub skip_queued_branch_builds: Option<bool>,
    #[serde(default)]
    pub skip_queued_branch_builds_filter: Option<String>,
    #[serde(default)]
    pub cancel_running_branch_builds: Option<bool>,
    #[serde(default)]
    pub cancel_running_branch_builds_filter: Option<String>,
    #[serde(default, alias = "environment")]
    pub env: BTreeMap<String, String>,
    #[serde(default, alias = "step")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub github_settings: Option<GitHubSettings>,
    #[serde(default)]
    pub bitbucket_settings: Option<BitbucketSettings>,
}

impl PipelineDeclaration {
    /// Create a declaration with the required fields
    pub fn new(name: impl Into<String>, repository: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            steps,
            ..Default::default()
        }
    }

    /// Validates the declaration
    ///
    /// Reconciler operations assume a validated declaration and do not call
    /// this themselves.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ReconcileError::InvalidDeclaration(
                "name cannot be empty".to_string(),
            ));
        }

        if self.repository.trim().is_empty() {
            return Err(ReconcileError::InvalidDeclaration(
                "repository cannot be empty".to_string(),
            ));
        }

        if let Some(index) = self.steps.iter().position(|s| s.step_type.is_empty()) {
            return Err(ReconcileError::InvalidDeclaration(format!(
                "steps[{}].type cannot be empty",
                index
            )));
        }

        if self.github_settings.is_some() && self.bitbucket_settings.is_some() {
            return Err(ReconcileError::ConflictingSettings);
        }

        Ok(())
    }

    /// True when either provider settings block is declared
    pub fn has_settings_block(&self) -> bool {
        self.github_settings.is_some() || self.bitbucket_settings.is_some()
    }

    /// Select the provider settings to send
    ///
    /// GitHub takes precedence when both blocks are present. Returns `None`
    /// when no block is declared or the chosen block sets no key.
    pub fn provider_settings(&self) -> Option<ProviderSettings> {
        let settings = match (&self.github_settings, &self.bitbucket_settings) {
            (Some(github), Some(_)) => {
                warn!("Both provider settings blocks declared, using github_settings");
                ProviderSettings::GitHub(github.clone())
            }
            (Some(github), None) => ProviderSettings::GitHub(github.clone()),
            (None, Some(bitbucket)) => ProviderSettings::Bitbucket(bitbucket.clone()),
            (None, None) => return None,
        };

        (!settings.is_empty()).then_some(settings)
    }

    /// Assemble the request payload
    ///
    /// # Arguments
    /// * `include_settings` - Whether to attach `provider_settings`
    pub fn to_request(&self, include_settings: bool) -> PipelineRequest {
        PipelineRequest {
            slug: self.slug.clone().filter(|s| !s.is_empty()),
            name: self.name.clone(),
            repository: self.repository.clone(),
            description: self.description.clone(),
            default_branch: Some(
                self.default_branch
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            ),
            branch_configuration: self.branch_configuration.clone(),
            skip_queued_branch_builds: self.skip_queued_branch_builds,
            skip_queued_branch_builds_filter: self.skip_queued_branch_builds_filter.clone(),
            cancel_running_branch_builds: self.cancel_running_branch_builds,
            cancel_running_branch_builds_filter: self.cancel_running_branch_builds_filter.clone(),
            env: self.env.clone(),
            steps: self.steps.clone(),
            provider_settings: if include_settings {
                self.provider_settings()
            } else {
                None
            },
        }
    }
}
