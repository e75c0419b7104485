//! Provider settings change detection

use serde::Serialize;
use serde_json::{Map, Value};

use crate::declaration::PipelineDeclaration;
use crate::state::PipelineState;

/// Which provider settings blocks changed since the last apply
///
/// `provider_settings` is only sent on update when at least one flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub github: bool,
    pub bitbucket: bool,
}

impl SettingsChange {
    /// No block changed
    pub const NONE: Self = Self {
        github: false,
        bitbucket: false,
    };

    /// True when either block changed
    pub fn changed(&self) -> bool {
        self.github || self.bitbucket
    }

    /// Compare a declaration against the last projected state
    ///
    /// A block changed when it sets a key whose value differs from the state.
    /// Removing a block is not a change: the server keeps its settings.
    pub fn between(previous: &PipelineState, declared: &PipelineDeclaration) -> Self {
        Self {
            github: block_changed(
                previous.github_settings.as_ref(),
                declared.github_settings.as_ref(),
            ),
            bitbucket: block_changed(
                previous.bitbucket_settings.as_ref(),
                declared.bitbucket_settings.as_ref(),
            ),
        }
    }
}

fn block_changed<T: Serialize>(previous: Option<&T>, declared: Option<&T>) -> bool {
    let Some(declared) = declared else {
        return false;
    };

    let previous = previous.map(explicit_keys).unwrap_or_default();
    explicit_keys(declared)
        .iter()
        .any(|(key, value)| previous.get(key) != Some(value))
}

/// Keys a settings block sets, with their values
fn explicit_keys<T: Serialize>(block: &T) -> Map<String, Value> {
    match serde_json::to_value(block) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_core::domain::provider::{BitbucketSettings, GitHubSettings};

    fn declared_github(settings: GitHubSettings) -> PipelineDeclaration {
        PipelineDeclaration {
            github_settings: Some(settings),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_blocks_no_change() {
        let change =
            SettingsChange::between(&PipelineState::default(), &PipelineDeclaration::default());
        assert_eq!(change, SettingsChange::NONE);
        assert!(!change.changed());
    }

    #[test]
    fn test_new_block_is_a_change() {
        let decl = declared_github(GitHubSettings {
            build_tags: Some(true),
            ..Default::default()
        });
        let change = SettingsChange::between(&PipelineState::default(), &decl);
        assert!(change.github);
        assert!(!change.bitbucket);
    }

    #[test]
    fn test_matching_keys_are_unchanged() {
        let previous = PipelineState {
            github_settings: Some(GitHubSettings {
                trigger_mode: Some("code".to_string()),
                build_tags: Some(true),
                publish_commit_status: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let decl = declared_github(GitHubSettings {
            build_tags: Some(true),
            ..Default::default()
        });

        assert!(!SettingsChange::between(&previous, &decl).changed());
    }

    #[test]
    fn test_differing_key_is_a_change() {
        let previous = PipelineState {
            bitbucket_settings: Some(BitbucketSettings {
                build_tags: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let decl = PipelineDeclaration {
            bitbucket_settings: Some(BitbucketSettings {
                build_tags: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let change = SettingsChange::between(&previous, &decl);
        assert!(change.bitbucket);
        assert!(!change.github);
    }

    #[test]
    fn test_removed_block_is_not_a_change() {
        let previous = PipelineState {
            github_settings: Some(GitHubSettings {
                build_tags: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(!SettingsChange::between(&previous, &PipelineDeclaration::default()).changed());
    }
}
