//! Shared logging setup and home-directory resolution for FormFlow.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "formflow=info,formflow_db=info";

/// Initialize tracing with stderr output.
///
/// `RUST_LOG` overrides the default filter; `verbose` widens it to debug.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("formflow=debug,formflow_db=debug")
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    debug!(verbose, "Logging initialized");
    Ok(())
}

/// Get the FormFlow home directory: ~/.formflow
///
/// `FORMFLOW_HOME` overrides the default location.
pub fn formflow_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("FORMFLOW_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".formflow")
}

/// Get the default database path: ~/.formflow/formflow.sqlite3
pub fn database_path() -> PathBuf {
    formflow_home().join("formflow.sqlite3")
}

/// Get the uploads directory: ~/.formflow/uploads
pub fn uploads_dir() -> PathBuf {
    formflow_home().join("uploads")
}

/// Ensure the home and uploads directories exist.
pub fn ensure_dirs() -> Result<PathBuf> {
    let home = formflow_home();
    fs::create_dir_all(&home)
        .with_context(|| format!("Failed to create home directory: {}", home.display()))?;
    let uploads = uploads_dir();
    fs::create_dir_all(&uploads)
        .with_context(|| format!("Failed to create uploads directory: {}", uploads.display()))?;
    debug!(home = %home.display(), "FormFlow directories verified");
    Ok(home)
}
