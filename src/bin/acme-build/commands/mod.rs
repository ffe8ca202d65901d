//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};

pub mod build;
pub mod resolve;
pub mod stage;

/// The `--project` argument, or the current directory.
pub(crate) fn project_root(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}
