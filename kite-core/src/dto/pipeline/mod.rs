//! Pipeline DTOs for create and update requests

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::provider::{BitbucketSettings, GitHubSettings};
use crate::domain::step::Step;

/// Full desired state of a pipeline, sent on both POST and PATCH
///
/// Optional scalars are only serialized when set. `steps` is always present,
/// even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub name: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_queued_branch_builds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_queued_branch_builds_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_running_branch_builds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_running_branch_builds_filter: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_settings: Option<ProviderSettings>,
}

/// Provider settings sub-payload
///
/// Serialized as the bare settings object; the API infers the provider from
/// the repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderSettings {
    GitHub(GitHubSettings),
    Bitbucket(BitbucketSettings),
}

impl ProviderSettings {
    /// True when no key is explicitly set
    pub fn is_empty(&self) -> bool {
        match self {
            Self::GitHub(settings) => *settings == GitHubSettings::default(),
            Self::Bitbucket(settings) => *settings == BitbucketSettings::default(),
        }
    }
}
