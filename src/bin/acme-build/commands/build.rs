//! `acme-build build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use acme_build::ops::{build, BuildOptions};
use acme_build::resolver::host_platform_id;

pub fn execute(args: BuildArgs) -> Result<()> {
    let opts = BuildOptions {
        project_root: super::project_root(args.project)?,
        build_dir: args.build_dir,
        platform_id: args.platform.unwrap_or_else(host_platform_id),
        dry_run: args.dry_run,
    };

    let outcome = build(&opts)?;

    if outcome.executed {
        eprintln!("    Finished build");
    } else {
        println!("{}", outcome.configure_command);
        println!("{}", outcome.build_command);
    }

    Ok(())
}
