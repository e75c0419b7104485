//! State file
//!
//! Persists the projected [`PipelineState`] between runs. A missing file means
//! no pipeline is tracked.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kite_reconciler::PipelineState;

/// JSON file holding the last known pipeline state
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the tracked state, if any
    pub fn load(&self) -> Result<Option<PipelineState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(Some(state))
    }

    /// Replace the tracked state
    pub fn save(&self, state: &PipelineState) -> Result<()> {
        let content = serde_json::to_string_pretty(state).context("Failed to encode state")?;

        // Write then rename so a failed write never truncates the previous state
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file: {}", self.path.display()))?;

        Ok(())
    }

    /// Forget the tracked pipeline
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove state file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_core::domain::provider::GitHubSettings;
    use kite_core::domain::step::Step;

    #[test]
    fn test_missing_file_is_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateFile::new(dir.path().join("kite.state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateFile::new(dir.path().join("kite.state.json"));

        let state = PipelineState {
            id: "my-pipeline".to_string(),
            slug: "my-pipeline".to_string(),
            name: "My Pipeline".to_string(),
            steps: vec![Step::script("test", "make test")],
            webhook_url: Some("https://webhook.buildkite.com/deliver/abc".to_string()),
            github_settings: Some(GitHubSettings {
                build_tags: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
        assert!(!dir.path().join("kite.state.json.tmp").exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kite.state.json");
        fs::write(&path, "not json").unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));
    }
}
