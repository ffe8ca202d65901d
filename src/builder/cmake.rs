//! CMake configure and build invocation driven by a [`BuildConfig`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::resolver::is_windows_platform;
use crate::util::config::BuildConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Generator used on Windows when `use_alternate_generator` is set.
pub const ALTERNATE_GENERATOR: &str = "NMake Makefiles";

/// A configure + build run of one CMake project.
#[derive(Debug, Clone)]
pub struct CMakeInvocation {
    config: BuildConfig,
    platform_id: String,
    source_dir: PathBuf,
    build_dir: PathBuf,
    program: PathBuf,
}

impl CMakeInvocation {
    /// Create an invocation using the `cmake` found on `PATH`.
    pub fn new(
        config: BuildConfig,
        platform_id: impl Into<String>,
        source_dir: PathBuf,
        build_dir: PathBuf,
    ) -> Self {
        CMakeInvocation {
            config,
            platform_id: platform_id.into(),
            source_dir,
            build_dir,
            program: find_cmake().unwrap_or_else(|| PathBuf::from("cmake")),
        }
    }

    /// Use a specific CMake binary.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for the configure step. Paths are passed through as-is.
    pub fn configure_args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("-S"),
            self.source_dir.clone().into_os_string(),
            OsString::from("-B"),
            self.build_dir.clone().into_os_string(),
        ];

        if is_windows_platform(&self.platform_id) && self.config.use_alternate_generator() {
            args.push("-G".into());
            args.push(ALTERNATE_GENERATOR.into());
        }

        args.push(format!("-DCMAKE_BUILD_TYPE={}", self.config.build_type()).into());
        args.push(format!("-DBUILD_SHARED_LIBS={}", on_off(self.config.dynamic())).into());
        args.push(format!("-DBUILD_EXECUTABLE={}", on_off(self.config.executable())).into());

        args
    }

    /// Arguments for the build step.
    ///
    /// The parallel flag tokens come before the quiet flag tokens, since
    /// everything after the quiet flag's `--` goes to the native tool.
    pub fn build_args(&self) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("--build"),
            self.build_dir.clone().into_os_string(),
            OsString::from("--config"),
            OsString::from(self.config.build_type()),
            OsString::from("--target"),
            OsString::from("install"),
        ];

        args.extend(self.config.parallel_flag().split_whitespace().map(OsString::from));
        args.extend(self.config.quiet_flag().split_whitespace().map(OsString::from));

        args
    }

    /// The configure command.
    pub fn configure_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).args(self.configure_args())
    }

    /// The build command.
    pub fn build_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).args(self.build_args())
    }

    /// Configure, then build.
    pub fn run(&self) -> Result<()> {
        if which::which(&self.program).is_err() {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build the ACME library.\n\
                 Install CMake and ensure it's in your PATH."
            );
        }

        ensure_dir(&self.build_dir)?;

        tracing::info!("Configuring {}", self.source_dir.display());
        self.configure_command()
            .exec_and_check()
            .context("CMake configuration failed")?;

        tracing::info!("Building {}", self.build_dir.display());
        self.build_command()
            .exec_and_check()
            .context("CMake build failed")?;

        Ok(())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}
