//! Pipeline lifecycle operations
//!
//! Each operation issues exactly one request and keeps no state between
//! calls. The caller owns the persisted attributes.

use kite_client::ApiClient;
use kite_core::domain::pipeline::Pipeline;
use tracing::{info, warn};

use crate::change::SettingsChange;
use crate::config::ProviderConfig;
use crate::declaration::PipelineDeclaration;
use crate::error::{ReconcileError, Result};
use crate::state::PipelineState;

/// What `delete` does when the pipeline is already gone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingOnDelete {
    /// Surface the 404 as an error
    #[default]
    Error,
    /// Treat the pipeline as deleted
    Ignore,
}

/// Maps pipeline declarations onto the remote pipeline resource
#[derive(Debug, Clone)]
pub struct PipelineReconciler {
    client: ApiClient,
    missing_on_delete: MissingOnDelete,
}

impl PipelineReconciler {
    /// Create a reconciler over an existing client
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            missing_on_delete: MissingOnDelete::default(),
        }
    }

    /// Create a reconciler from provider configuration
    ///
    /// Validates the configuration and builds a client scoped to the
    /// organization.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config.organization_url(), config.api_token.clone())?;
        Ok(Self::new(client))
    }

    /// Set the behaviour of `delete` for already-deleted pipelines
    pub fn with_missing_on_delete(mut self, behaviour: MissingOnDelete) -> Self {
        self.missing_on_delete = behaviour;
        self
    }

    /// Get the underlying API client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Create a pipeline
    ///
    /// Provider settings are sent when a settings block is declared.
    pub async fn create(&self, declaration: &PipelineDeclaration) -> Result<Pipeline> {
        info!(name = %declaration.name, "Creating pipeline");

        let req = declaration.to_request(declaration.has_settings_block());
        let pipeline = self.client.create_pipeline(&req).await?;

        info!(slug = %pipeline.slug, "Pipeline created");
        Ok(pipeline)
    }

    /// Read a pipeline by slug
    ///
    /// # Returns
    /// `None` when the pipeline no longer exists; the caller should drop its
    /// stored identity.
    pub async fn read(&self, slug: &str) -> Result<Option<Pipeline>> {
        info!(slug, "Reading pipeline");

        match self.client.get_pipeline(slug).await {
            Ok(pipeline) => Ok(Some(pipeline)),
            Err(err) if err.is_not_found() => {
                info!(slug, "Pipeline no longer exists");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Update a pipeline with its full desired state
    ///
    /// `provider_settings` is only attached when `change` reports a changed
    /// settings block.
    pub async fn update(
        &self,
        slug: &str,
        declaration: &PipelineDeclaration,
        change: SettingsChange,
    ) -> Result<Pipeline> {
        info!(slug, "Updating pipeline");
        if change.changed() {
            info!(slug, "Repository provider settings have changed");
        }

        let req = declaration.to_request(change.changed());
        Ok(self.client.update_pipeline(slug, &req).await?)
    }

    /// Delete a pipeline by slug
    pub async fn delete(&self, slug: &str) -> Result<()> {
        info!(slug, "Deleting pipeline");

        match self.client.delete_pipeline(slug).await {
            Err(err) if err.is_not_found() && self.missing_on_delete == MissingOnDelete::Ignore => {
                warn!(slug, "Pipeline already deleted");
                Ok(())
            }
            result => Ok(result?),
        }
    }

    /// Import an existing pipeline by slug
    ///
    /// Unlike `read`, a missing pipeline is an error.
    pub async fn import(&self, slug: &str) -> Result<PipelineState> {
        info!(slug, "Importing pipeline");

        self.read(slug)
            .await?
            .map(|pipeline| PipelineState::from(&pipeline))
            .ok_or_else(|| ReconcileError::NotFound {
                slug: slug.to_string(),
            })
    }
}
