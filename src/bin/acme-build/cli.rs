//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// acme-build - build options and toolbox staging for the ACME library
#[derive(Parser)]
#[command(name = "acme-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the build options CMake would be invoked with
    Resolve(ResolveArgs),

    /// Populate the toolbox directory with sources, headers and license
    Stage(StageArgs),

    /// Configure and build the project with CMake
    Build(BuildArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Platform id to resolve for (defaults to the host)
    #[arg(long, env = "ACME_BUILD_PLATFORM")]
    pub platform: Option<String>,

    /// Project directory (defaults to current directory)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct StageArgs {
    /// Project directory (defaults to current directory)
    #[arg(long)]
    pub project: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Platform id to resolve for (defaults to the host)
    #[arg(long, env = "ACME_BUILD_PLATFORM")]
    pub platform: Option<String>,

    /// Project directory (defaults to current directory)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Build directory (defaults to <project>/build)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Print the CMake commands without running them
    #[arg(long)]
    pub dry_run: bool,
}
