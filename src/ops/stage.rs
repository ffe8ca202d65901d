//! Implementation of `acme-build stage`.
//!
//! Populates the toolbox directory used for the MATLAB packaging of the
//! library: every source and header file lands flat in `toolbox/src`, and
//! the project license is copied next to it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::fs::{copy_file, ensure_dir, glob_files, remove_dir_all_if_exists};

/// What to copy and where.
#[derive(Debug, Clone)]
pub struct StagingPlan {
    /// Directory the glob patterns are relative to
    pub base: PathBuf,

    /// Glob patterns selecting the files to stage
    pub patterns: Vec<String>,

    /// Directory receiving the files; cleared before copying
    pub dest: PathBuf,

    /// License file and the path it is copied to
    pub license: Option<(PathBuf, PathBuf)>,
}

impl StagingPlan {
    /// The standard ACME toolbox layout under `project_root`.
    pub fn toolbox(project_root: &Path) -> Self {
        let toolbox = project_root.join("toolbox");
        StagingPlan {
            base: project_root.to_path_buf(),
            patterns: vec!["src/*.c*".to_string(), "include/*.h*".to_string()],
            dest: toolbox.join("src"),
            license: Some((
                project_root.join("LICENSE.txt"),
                toolbox.join("license.txt"),
            )),
        }
    }
}

/// Outcome of a staging run.
#[derive(Debug, Clone, Default)]
pub struct StagingReport {
    /// Files written to the destination, in copy order
    pub staged: Vec<PathBuf>,

    /// Where the license was copied, if it was
    pub license: Option<PathBuf>,
}

impl StagingReport {
    /// Number of distinct files in the destination after staging.
    pub fn file_count(&self) -> usize {
        let mut unique = self.staged.clone();
        unique.sort();
        unique.dedup();
        unique.len()
    }
}

/// Clear `plan.dest`, then copy every matching file into it by basename.
///
/// When two matches share a basename the later one wins. A missing license
/// file is an error and leaves the destination untouched.
pub fn stage(plan: &StagingPlan) -> Result<StagingReport> {
    if plan.dest == plan.base || plan.base.starts_with(&plan.dest) {
        bail!(
            "refusing to clear {}: it contains the staging sources",
            plan.dest.display()
        );
    }

    if let Some((src, _)) = &plan.license {
        if !src.is_file() {
            bail!("license file not found: {}", src.display());
        }
    }

    remove_dir_all_if_exists(&plan.dest)?;
    ensure_dir(&plan.dest)?;

    let mut report = StagingReport::default();

    for pattern in &plan.patterns {
        let matches = glob_files(&plan.base, pattern)?;
        if matches.is_empty() {
            tracing::warn!("no files match `{}`", pattern);
            continue;
        }

        for src in matches {
            let Some(name) = src.file_name() else {
                continue;
            };
            let dst = plan.dest.join(name);
            copy_file(&src, &dst)?;
            tracing::debug!("staged {}", dst.display());
            report.staged.push(dst);
        }
    }

    if let Some((src, dst)) = &plan.license {
        copy_file(src, dst)?;
        report.license = Some(dst.clone());
    }

    tracing::info!(
        "staged {} files into {}",
        report.file_count(),
        plan.dest.display()
    );

    Ok(report)
}
