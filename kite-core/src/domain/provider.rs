//! Repository provider domain types
//!
//! The API describes the linked source-control host as an untyped object keyed
//! by an `id` discriminant. It is decoded here into [`RepositoryProvider`], with
//! a typed settings struct for the hosts that carry settings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Settings keys that identify the repository rather than configure the link
pub const EXCLUDED_SETTINGS_KEYS: [&str; 2] = ["repository", "account"];

/// Repository hosting integration attached to a pipeline
///
/// Decode-only: the API accepts provider changes through the separate
/// `provider_settings` payload instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryProvider {
    GitHub {
        webhook_url: String,
        settings: GitHubSettings,
    },
    Bitbucket {
        webhook_url: String,
        settings: BitbucketSettings,
    },
    GitLab {
        webhook_url: String,
    },
    Beanstalk {
        webhook_url: String,
    },
    /// Any host this crate does not know about
    Unknown { id: String },
}

impl RepositoryProvider {
    /// The discriminant as sent by the API
    pub fn id(&self) -> &str {
        match self {
            Self::GitHub { .. } => "github",
            Self::Bitbucket { .. } => "bitbucket",
            Self::GitLab { .. } => "gitlab",
            Self::Beanstalk { .. } => "beanstalk",
            Self::Unknown { id } => id,
        }
    }

    /// Webhook URL for known providers
    pub fn webhook_url(&self) -> Option<&str> {
        match self {
            Self::GitHub { webhook_url, .. }
            | Self::Bitbucket { webhook_url, .. }
            | Self::GitLab { webhook_url }
            | Self::Beanstalk { webhook_url } => Some(webhook_url),
            Self::Unknown { .. } => None,
        }
    }
}

#[derive(Deserialize)]
struct RawProvider {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    webhook_url: Option<String>,
    #[serde(default)]
    settings: Option<Map<String, Value>>,
}

impl<'de> Deserialize<'de> for RepositoryProvider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawProvider::deserialize(deserializer)?;

        let mut settings = raw.settings.unwrap_or_default();
        for key in EXCLUDED_SETTINGS_KEYS {
            settings.remove(key);
        }
        let settings = Value::Object(settings);
        let webhook_url = raw.webhook_url.unwrap_or_default();

        let provider = match raw.id.as_deref().unwrap_or_default() {
            "github" => Self::GitHub {
                webhook_url,
                settings: serde_json::from_value(settings).map_err(D::Error::custom)?,
            },
            "bitbucket" => Self::Bitbucket {
                webhook_url,
                settings: serde_json::from_value(settings).map_err(D::Error::custom)?,
            },
            "gitlab" => Self::GitLab { webhook_url },
            "beanstalk" => Self::Beanstalk { webhook_url },
            other => Self::Unknown {
                id: other.to_string(),
            },
        };

        Ok(provider)
    }
}

/// GitHub integration settings
///
/// Every key is optional. `None` means the caller did not set the key, and it
/// is never serialized so the server keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// One of "code", "deployment", "fork" or "none"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_pull_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_branch_filter_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_branch_filter_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_pull_request_builds_for_existing_commits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_pull_request_forks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_pull_request_fork_branch_names: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_commit_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_commit_status_per_step: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_blocked_as_pending: Option<bool>,
}

/// Bitbucket integration settings
///
/// Same explicit-key semantics as [`GitHubSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitbucketSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_pull_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_branch_filter_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_branch_filter_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_pull_request_builds_for_existing_commits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_commit_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_commit_status_per_step: Option<bool>,
}
