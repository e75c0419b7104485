//! Pipeline-related API endpoints

use crate::ApiClient;
use crate::error::Result;
use kite_core::domain::pipeline::Pipeline;
use kite_core::dto::pipeline::PipelineRequest;

impl ApiClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Create a new pipeline
    ///
    /// # Arguments
    /// * `req` - The full desired pipeline state
    ///
    /// # Returns
    /// The created pipeline, including the server-assigned slug
    ///
    /// # Example
    /// ```no_run
    /// # use kite_client::ApiClient;
    /// # use kite_core::domain::step::Step;
    /// # use kite_core::dto::pipeline::PipelineRequest;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ApiClient::new("https://api.buildkite.com/v2/organizations/acme/", "token")?;
    /// let pipeline = client.create_pipeline(&PipelineRequest {
    ///     name: "my-pipeline".to_string(),
    ///     repository: "git@github.com:acme/repo.git".to_string(),
    ///     steps: vec![Step::script("test", "make test")],
    ///     ..Default::default()
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_pipeline(&self, req: &PipelineRequest) -> Result<Pipeline> {
        self.post(&["pipelines"], req).await
    }

    /// Get a pipeline by slug
    ///
    /// # Arguments
    /// * `slug` - The pipeline slug
    pub async fn get_pipeline(&self, slug: &str) -> Result<Pipeline> {
        self.get(&["pipelines", slug]).await
    }

    /// Update a pipeline with its full desired state
    ///
    /// # Arguments
    /// * `slug` - The pipeline slug
    /// * `req` - The full desired pipeline state
    pub async fn update_pipeline(&self, slug: &str, req: &PipelineRequest) -> Result<Pipeline> {
        self.patch(&["pipelines", slug], req).await
    }

    /// Delete a pipeline
    ///
    /// # Arguments
    /// * `slug` - The pipeline slug to delete
    pub async fn delete_pipeline(&self, slug: &str) -> Result<()> {
        self.delete(&["pipelines", slug]).await
    }
}
