//! Error types for pipeline reconciliation

use kite_client::ClientError;
use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while reconciling a pipeline
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Transport, remote or serialization failure, passed through unchanged
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Provider configuration is missing or malformed
    #[error("Invalid provider configuration: {0}")]
    Configuration(String),

    /// Declaration is missing a required value
    #[error("Invalid pipeline declaration: {0}")]
    InvalidDeclaration(String),

    /// Both provider settings blocks were declared
    #[error("github_settings and bitbucket_settings are mutually exclusive")]
    ConflictingSettings,

    /// Import target does not exist
    #[error("Pipeline '{slug}' does not exist")]
    NotFound {
        /// Slug that was looked up
        slug: String,
    },
}

impl ReconcileError {
    /// Check if the remote pipeline is missing
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Client(err) => err.is_not_found(),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }
}
