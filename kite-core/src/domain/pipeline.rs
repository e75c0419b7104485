//! Pipeline domain types

use std::collections::BTreeMap;

use serde::Deserialize;

use super::null_as_default;
use super::provider::RepositoryProvider;
use super::step::Step;

/// Pipeline as returned by the API
///
/// Identity is the `slug`, assigned by the server from the name on create
/// unless the caller supplied one. Only decoded, never sent: writes go through
/// [`crate::dto::pipeline::PipelineRequest`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pipeline {
    /// Server-assigned id, kept verbatim
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub web_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub builds_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub badge_url: String,
    /// Creation timestamp exactly as the server rendered it
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repository: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub branch_configuration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skip_queued_branch_builds: bool,
    #[serde(default)]
    pub skip_queued_branch_builds_filter: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancel_running_branch_builds: bool,
    #[serde(default)]
    pub cancel_running_branch_builds_filter: Option<String>,
    /// Environment injected into every build
    #[serde(default, deserialize_with = "null_as_default")]
    pub env: BTreeMap<String, String>,
    /// Steps in execution order
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    /// Repository hosting integration, present once the pipeline exists
    #[serde(default)]
    pub provider: Option<RepositoryProvider>,
}
