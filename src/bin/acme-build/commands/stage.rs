//! `acme-build stage` command

use anyhow::Result;

use crate::cli::StageArgs;
use acme_build::ops::{stage, StagingPlan};

pub fn execute(args: StageArgs) -> Result<()> {
    let project_root = super::project_root(args.project)?;
    let plan = StagingPlan::toolbox(&project_root);

    let report = stage(&plan)?;

    eprintln!(
        "      Staged {} files into {}",
        report.file_count(),
        plan.dest.display()
    );
    if let Some(license) = &report.license {
        eprintln!("      Copied {}", license.display());
    }

    Ok(())
}
