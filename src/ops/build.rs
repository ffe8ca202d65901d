//! Implementation of `acme-build build` and `acme-build resolve`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::{is_cmake_project, CMakeInvocation};
use crate::resolver::{CMakeVersionQuery, VersionQuery};
use crate::util::config::{default_chain, BuildConfig};

/// Resolve the build configuration for a project through the standard
/// provider chain.
pub fn resolve_config(
    project_root: &Path,
    platform_id: &str,
    query: impl VersionQuery + 'static,
) -> Result<BuildConfig> {
    default_chain(project_root, platform_id, query).resolve()
}

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the top-level CMakeLists.txt
    pub project_root: PathBuf,

    /// Build directory (default: `<project>/build`)
    pub build_dir: Option<PathBuf>,

    /// Platform id used for resolution
    pub platform_id: String,

    /// Only compute the commands
    pub dry_run: bool,
}

/// What a build did, or would do.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub config: BuildConfig,
    pub configure_command: String,
    pub build_command: String,
    pub executed: bool,
}

/// Resolve options and run CMake for the project.
pub fn build(options: &BuildOptions) -> Result<BuildOutcome> {
    if !is_cmake_project(&options.project_root) {
        bail!(
            "no CMakeLists.txt found in {}",
            options.project_root.display()
        );
    }

    let config = resolve_config(
        &options.project_root,
        &options.platform_id,
        CMakeVersionQuery::new(),
    )?;

    let build_dir = options
        .build_dir
        .clone()
        .unwrap_or_else(|| options.project_root.join("build"));

    let invocation = CMakeInvocation::new(
        config.clone(),
        options.platform_id.clone(),
        options.project_root.clone(),
        build_dir,
    );

    let mut outcome = BuildOutcome {
        config,
        configure_command: invocation.configure_command().display_command(),
        build_command: invocation.build_command().display_command(),
        executed: false,
    };

    if options.dry_run {
        return Ok(outcome);
    }

    invocation.run()?;
    outcome.executed = true;
    Ok(outcome)
}
