//! Kite Reconciler
//!
//! Create, read, update, delete and import for Buildkite pipelines, driven by
//! a caller-owned declaration and state.
//!
//! This crate contains:
//! - Declarations: the caller's desired state and payload assembly
//! - Change detection: whether provider settings must be resent
//! - State: projection of API responses into flat caller attributes
//! - Reconciler: the lifecycle operations over [`kite_client::ApiClient`]
//!
//! # Example
//!
//! ```no_run
//! use kite_core::domain::step::Step;
//! use kite_reconciler::{PipelineDeclaration, PipelineReconciler, PipelineState, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reconciler = PipelineReconciler::from_config(&ProviderConfig::from_env()?)?;
//!
//!     let declaration = PipelineDeclaration::new(
//!         "my-pipeline",
//!         "git@github.com:acme/repo.git",
//!         vec![Step::script("test", "make test")],
//!     );
//!     let pipeline = reconciler.create(&declaration).await?;
//!
//!     let state = PipelineState::from(&pipeline);
//!     println!("Created {}", state.id);
//!     Ok(())
//! }
//! ```

pub mod change;
pub mod config;
pub mod declaration;
pub mod error;
pub mod reconciler;
pub mod state;

// Re-export commonly used types
pub use change::SettingsChange;
pub use config::ProviderConfig;
pub use declaration::PipelineDeclaration;
pub use error::{ReconcileError, Result};
pub use reconciler::{MissingOnDelete, PipelineReconciler};
pub use state::{Attributes, PipelineState};
