//! Pipeline command handlers
//!
//! Handles all pipeline-related CLI commands: applying a declaration,
//! refreshing, destroying, importing and showing the tracked pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use kite_core::domain::step::Step;
use kite_reconciler::{
    MissingOnDelete, PipelineDeclaration, PipelineReconciler, PipelineState, SettingsChange,
};
use tracing::info;

use crate::config::Config;
use crate::state_file::StateFile;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Create or update the pipeline from a JSON declaration
    Apply {
        /// Path to the JSON declaration
        file: PathBuf,
    },
    /// Refresh the state file from Buildkite
    Refresh,
    /// Delete the tracked pipeline
    Destroy {
        /// Succeed when the pipeline is already gone
        #[arg(long)]
        ignore_missing: bool,
    },
    /// Start tracking an existing pipeline
    Import {
        /// Pipeline slug
        slug: String,
    },
    /// Print the tracked attributes
    Show,
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let store = StateFile::new(&config.state_path);

    match command {
        PipelineCommands::Apply { file } => apply(&config.reconciler()?, &store, &file).await,
        PipelineCommands::Refresh => refresh(&config.reconciler()?, &store).await,
        PipelineCommands::Destroy { ignore_missing } => {
            let behaviour = if ignore_missing {
                MissingOnDelete::Ignore
            } else {
                MissingOnDelete::Error
            };
            destroy(&config.reconciler()?.with_missing_on_delete(behaviour), &store).await
        }
        PipelineCommands::Import { slug } => import(&config.reconciler()?, &store, &slug).await,
        PipelineCommands::Show => show(&store),
    }
}

/// Read and validate a declaration file
fn load_declaration(path: &Path) -> Result<PipelineDeclaration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration file: {}", path.display()))?;

    let declaration: PipelineDeclaration = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse declaration file: {}", path.display()))?;

    declaration.validate().context("Invalid pipeline declaration")?;

    Ok(declaration)
}

/// Create the pipeline, or update the tracked one
///
/// The tracked pipeline is refreshed first; if it disappeared remotely it is
/// created again.
async fn apply(reconciler: &PipelineReconciler, store: &StateFile, file: &Path) -> Result<()> {
    let declaration = load_declaration(file)?;

    let previous = match store.load()? {
        Some(previous) => match reconciler.read(&previous.id).await? {
            Some(current) => Some(PipelineState::from(&current)),
            None => {
                info!(slug = %previous.id, "Tracked pipeline no longer exists, recreating");
                None
            }
        },
        None => None,
    };

    let (pipeline, verb) = match previous {
        Some(previous) => {
            let change = SettingsChange::between(&previous, &declaration);
            let pipeline = reconciler.update(&previous.id, &declaration, change).await?;
            (pipeline, "updated")
        }
        None => (reconciler.create(&declaration).await?, "created"),
    };

    let state = PipelineState::from(&pipeline);
    store.save(&state)?;

    println!("{}", format!("✓ Pipeline {} successfully!", verb).green().bold());
    print_pipeline_summary(&state);

    Ok(())
}

/// Refresh the tracked pipeline
async fn refresh(reconciler: &PipelineReconciler, store: &StateFile) -> Result<()> {
    let Some(previous) = store.load()? else {
        println!("{}", "No pipeline tracked.".yellow());
        return Ok(());
    };

    match reconciler.read(&previous.id).await? {
        Some(pipeline) => {
            let state = PipelineState::from(&pipeline);
            store.save(&state)?;
            println!("{}", "✓ Pipeline refreshed.".green().bold());
            print_pipeline_summary(&state);
        }
        None => {
            store.clear()?;
            println!(
                "{}",
                format!("Pipeline {} no longer exists; state cleared.", previous.id).yellow()
            );
        }
    }

    Ok(())
}

/// Delete the tracked pipeline
async fn destroy(reconciler: &PipelineReconciler, store: &StateFile) -> Result<()> {
    let Some(previous) = store.load()? else {
        println!("{}", "No pipeline tracked.".yellow());
        return Ok(());
    };

    reconciler.delete(&previous.id).await?;
    store.clear()?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted successfully!", previous.id)
            .green()
            .bold()
    );

    Ok(())
}

/// Start tracking an existing pipeline
async fn import(reconciler: &PipelineReconciler, store: &StateFile, slug: &str) -> Result<()> {
    if let Some(existing) = store.load()? {
        bail!(
            "State file {} already tracks pipeline '{}'",
            store.path().display(),
            existing.id
        );
    }

    let state = reconciler.import(slug).await?;
    store.save(&state)?;

    println!("{}", "✓ Pipeline imported successfully!".green().bold());
    print_pipeline_summary(&state);

    Ok(())
}

/// Print every tracked attribute
fn show(store: &StateFile) -> Result<()> {
    let Some(state) = store.load()? else {
        println!("{}", "No pipeline tracked.".yellow());
        return Ok(());
    };

    for (key, value) in state.attributes() {
        println!("{} = {}", key.cyan(), value);
    }

    Ok(())
}

/// Print a pipeline summary
fn print_pipeline_summary(state: &PipelineState) {
    println!("  Slug:       {}", state.slug.cyan());
    println!("  Name:       {}", state.name.bold());
    println!("  Repository: {}", state.repository.dimmed());
    if !state.web_url.is_empty() {
        println!("  Web URL:    {}", state.web_url.dimmed());
    }
    if let Some(webhook_url) = &state.webhook_url {
        println!("  Webhook:    {}", webhook_url.dimmed());
    }
    println!(
        "  Steps:      {}",
        state
            .steps
            .iter()
            .map(step_label)
            .collect::<Vec<_>>()
            .join(", ")
            .dimmed()
    );
}

fn step_label(step: &Step) -> &str {
    if step.name.is_empty() {
        &step.step_type
    } else {
        &step.name
    }
}
