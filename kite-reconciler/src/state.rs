//! Pipeline state projection
//!
//! [`PipelineState`] is the caller-owned record of a pipeline after the last
//! create, read or update. [`PipelineState::attributes`] renders it in the flat
//! `key -> value` form declarative tools persist, with indexed blocks for steps
//! and provider settings.

use std::collections::BTreeMap;

use kite_core::domain::pipeline::Pipeline;
use kite_core::domain::provider::{BitbucketSettings, GitHubSettings, RepositoryProvider};
use kite_core::domain::step::Step;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Flat attribute set, keyed by dotted attribute path
pub type Attributes = BTreeMap<String, String>;

/// Projection of a decoded pipeline into caller attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Resource identity, always equal to `slug`
    pub id: String,
    pub slug: String,
    /// Server-assigned id, verbatim
    #[serde(default)]
    pub pipeline_id: String,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub url: String,
    pub web_url: String,
    pub builds_url: String,
    pub badge_url: String,
    /// Creation timestamp as the server rendered it, empty when absent
    pub created_at: String,
    pub default_branch: String,
    pub branch_configuration: String,
    pub skip_queued_branch_builds: bool,
    pub skip_queued_branch_builds_filter: String,
    pub cancel_running_branch_builds: bool,
    pub cancel_running_branch_builds_filter: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Set for every known provider, never for unknown ones
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub github_settings: Option<GitHubSettings>,
    #[serde(default)]
    pub bitbucket_settings: Option<BitbucketSettings>,
}

impl From<&Pipeline> for PipelineState {
    fn from(pipeline: &Pipeline) -> Self {
        info!(slug = %pipeline.slug, "Projecting pipeline state");

        let mut state = Self {
            id: pipeline.slug.clone(),
            slug: pipeline.slug.clone(),
            pipeline_id: pipeline.id.clone(),
            name: pipeline.name.clone(),
            description: pipeline.description.clone().unwrap_or_default(),
            repository: pipeline.repository.clone(),
            url: pipeline.url.clone(),
            web_url: pipeline.web_url.clone(),
            builds_url: pipeline.builds_url.clone(),
            badge_url: pipeline.badge_url.clone(),
            created_at: pipeline.created_at.clone().unwrap_or_default(),
            default_branch: pipeline.default_branch.clone().unwrap_or_default(),
            branch_configuration: pipeline.branch_configuration.clone().unwrap_or_default(),
            skip_queued_branch_builds: pipeline.skip_queued_branch_builds,
            skip_queued_branch_builds_filter: pipeline
                .skip_queued_branch_builds_filter
                .clone()
                .unwrap_or_default(),
            cancel_running_branch_builds: pipeline.cancel_running_branch_builds,
            cancel_running_branch_builds_filter: pipeline
                .cancel_running_branch_builds_filter
                .clone()
                .unwrap_or_default(),
            env: pipeline.env.clone(),
            steps: pipeline.steps.clone(),
            webhook_url: None,
            github_settings: None,
            bitbucket_settings: None,
        };

        if let Some(provider) = &pipeline.provider {
            info!(provider = provider.id(), "Repository provider");
            state.webhook_url = provider.webhook_url().map(str::to_string);

            match provider {
                RepositoryProvider::GitHub { settings, .. } => {
                    debug!(?settings, "GitHub provider settings");
                    state.github_settings = Some(settings.clone());
                }
                RepositoryProvider::Bitbucket { settings, .. } => {
                    debug!(?settings, "Bitbucket provider settings");
                    state.bitbucket_settings = Some(settings.clone());
                }
                _ => {}
            }
        }

        state
    }
}

impl PipelineState {
    /// Render the flat attribute set
    ///
    /// Lists are written as `key.#` plus `key.N`, maps as `key.%` plus
    /// `key.NAME`. Settings blocks always carry a count of 0 or 1.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();

        attrs.insert("id".to_string(), self.id.clone());
        attrs.insert("slug".to_string(), self.slug.clone());
        for (key, value) in [
            ("pipeline_id", &self.pipeline_id),
            ("name", &self.name),
            ("description", &self.description),
            ("repository", &self.repository),
            ("url", &self.url),
            ("web_url", &self.web_url),
            ("builds_url", &self.builds_url),
            ("badge_url", &self.badge_url),
            ("created_at", &self.created_at),
            ("default_branch", &self.default_branch),
            ("branch_configuration", &self.branch_configuration),
            (
                "skip_queued_branch_builds_filter",
                &self.skip_queued_branch_builds_filter,
            ),
            (
                "cancel_running_branch_builds_filter",
                &self.cancel_running_branch_builds_filter,
            ),
        ] {
            attrs.insert(key.to_string(), value.clone());
        }
        attrs.insert(
            "skip_queued_branch_builds".to_string(),
            self.skip_queued_branch_builds.to_string(),
        );
        attrs.insert(
            "cancel_running_branch_builds".to_string(),
            self.cancel_running_branch_builds.to_string(),
        );
        insert_map(&mut attrs, "env", &self.env);

        if let Some(webhook_url) = &self.webhook_url {
            attrs.insert("webhook_url".to_string(), webhook_url.clone());
        }

        attrs.insert("steps.#".to_string(), self.steps.len().to_string());
        for (index, step) in self.steps.iter().enumerate() {
            insert_step(&mut attrs, &format!("steps.{}", index), step);
        }

        insert_block(&mut attrs, "github_settings", self.github_settings.as_ref());
        insert_block(&mut attrs, "bitbucket_settings", self.bitbucket_settings.as_ref());

        attrs
    }
}

fn insert_map(attrs: &mut Attributes, prefix: &str, map: &BTreeMap<String, String>) {
    attrs.insert(format!("{}.%", prefix), map.len().to_string());
    for (key, value) in map {
        attrs.insert(format!("{}.{}", prefix, key), value.clone());
    }
}

fn insert_step(attrs: &mut Attributes, prefix: &str, step: &Step) {
    for (key, value) in [
        ("type", &step.step_type),
        ("name", &step.name),
        ("command", &step.command),
        ("branch_configuration", &step.branch_configuration),
        ("artifact_paths", &step.artifact_paths),
    ] {
        attrs.insert(format!("{}.{}", prefix, key), value.clone());
    }
    for (key, value) in [
        ("timeout_in_minutes", step.timeout_in_minutes),
        ("concurrency", step.concurrency),
        ("parallelism", step.parallelism),
    ] {
        attrs.insert(format!("{}.{}", prefix, key), value.to_string());
    }

    insert_map(attrs, &format!("{}.env", prefix), &step.env);

    attrs.insert(
        format!("{}.agent_query_rules.#", prefix),
        step.agent_query_rules.len().to_string(),
    );
    for (index, rule) in step.agent_query_rules.iter().enumerate() {
        attrs.insert(format!("{}.agent_query_rules.{}", prefix, index), rule.clone());
    }
}

fn insert_block<T: Serialize>(attrs: &mut Attributes, prefix: &str, block: Option<&T>) {
    let fields = block.and_then(|b| match serde_json::to_value(b) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    });

    let Some(fields) = fields else {
        attrs.insert(format!("{}.#", prefix), "0".to_string());
        return;
    };

    attrs.insert(format!("{}.#", prefix), "1".to_string());
    for (key, value) in fields {
        let rendered = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        attrs.insert(format!("{}.0.{}", prefix, key), rendered);
    }
}
