//! Build-option resolution.
//!
//! Decides the CMake parallelism and quiet-mode arguments for the host:
//!
//! - Windows toolchains (`mingw`, `mswin`) never get either flag, and
//!   CMake is not queried at all.
//! - Elsewhere `cmake --version` is run once. CMake 3.12 or newer gets
//!   `--parallel <N>` and `-- --quiet`; older, missing or unparsable
//!   versions get neither.
//!
//! Resolution never fails. Every probing error is logged and treated as an
//! unknown version.

pub mod errors;
pub mod platform;
pub mod version;

use std::path::PathBuf;

use crate::util::config::BuildConfig;
use crate::util::process::{find_cmake, ProcessBuilder};

pub use errors::ResolveError;
pub use platform::{host_platform_id, is_windows_platform};
pub use version::ToolVersion;

/// Source of a build tool's raw `--version` output.
pub trait VersionQuery {
    /// Run the tool and return its standard output as text.
    fn query(&self) -> Result<String, ResolveError>;
}

impl<F> VersionQuery for F
where
    F: Fn() -> Result<String, ResolveError>,
{
    fn query(&self) -> Result<String, ResolveError> {
        self()
    }
}

/// Queries the `cmake` found on `PATH`, or an explicit binary.
#[derive(Debug, Clone, Default)]
pub struct CMakeVersionQuery {
    program: Option<PathBuf>,
}

impl CMakeVersionQuery {
    /// Query the `cmake` found on `PATH`.
    pub fn new() -> Self {
        CMakeVersionQuery::default()
    }

    /// Query a specific CMake binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        CMakeVersionQuery {
            program: Some(program.into()),
        }
    }
}

impl VersionQuery for CMakeVersionQuery {
    fn query(&self) -> Result<String, ResolveError> {
        let program = self
            .program
            .clone()
            .or_else(find_cmake)
            .ok_or_else(|| ResolveError::unavailable("cmake", "not found in PATH"))?;

        let cmd = ProcessBuilder::new(&program).arg("--version");
        let output = cmd
            .exec()
            .map_err(|e| ResolveError::unavailable(cmd.display_command(), format!("{:#}", e)))?;

        if !output.status.success() {
            return Err(ResolveError::ExternalToolFailed {
                tool: cmd.display_command(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Number of processing units available to this process, or 0 if the host
/// will not say.
pub fn host_processor_count() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(e) => {
            tracing::warn!("could not detect processor count: {}", e);
            0
        }
    }
}

/// Resolve build options for `platform_id`, using the host processor count.
pub fn resolve(platform_id: &str, version_query: &dyn VersionQuery) -> BuildConfig {
    resolve_with_processors(platform_id, version_query, host_processor_count)
}

/// Resolve build options with an injected processor count.
///
/// `processors` is only called when the parallel flag is going to be set.
pub fn resolve_with_processors(
    platform_id: &str,
    version_query: &dyn VersionQuery,
    processors: impl FnOnce() -> usize,
) -> BuildConfig {
    if is_windows_platform(platform_id) {
        tracing::debug!(
            "platform `{}` is a Windows toolchain, skipping parallel/quiet flags",
            platform_id
        );
        return BuildConfig::default();
    }

    let version = match detect_version(version_query) {
        Ok(version) => version,
        Err(e) => {
            tracing::debug!("build tool version unknown: {}", e);
            return BuildConfig::default();
        }
    };

    if !version.supports_parallel_build() {
        tracing::debug!(
            "build tool {} predates parallel builds, leaving flags empty",
            version
        );
        return BuildConfig::default();
    }

    let jobs = processors();
    tracing::debug!("build tool {} supports parallel builds, jobs={}", version, jobs);

    BuildConfig::default().with_parallelism(jobs)
}

fn detect_version(version_query: &dyn VersionQuery) -> Result<ToolVersion, ResolveError> {
    let text = version_query.query()?;
    ToolVersion::parse_last(&text)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn reporting(text: &'static str) -> impl Fn() -> Result<String, ResolveError> {
        move || Ok(text.to_string())
    }

    #[test]
    fn test_windows_skips_query() {
        let calls = Cell::new(0);
        let query = || -> Result<String, ResolveError> {
            calls.set(calls.get() + 1);
            Ok("cmake version 3.27.0".to_string())
        };

        for platform in ["x64-mingw32", "x64-mswin64_140", "X64-MINGW-UCRT"] {
            let config = resolve_with_processors(platform, &query, || 8);
            assert_eq!(config.parallel_flag(), "");
            assert_eq!(config.quiet_flag(), "");
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_windows_returns_defaults() {
        let config = resolve_with_processors("x64-mingw32", &reporting("4.0.0"), || 8);
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn test_minimum_version_qualifies() {
        let config =
            resolve_with_processors("x86_64-linux", &reporting("cmake version 3.12.0"), || 4);
        assert_eq!(config.parallel_flag(), "--parallel 4 ");
        assert_eq!(config.quiet_flag(), "-- --quiet ");
    }

    #[test]
    fn test_old_version_leaves_flags_empty() {
        let config = resolve_with_processors("x86_64-linux", &reporting("3.11.9"), || 4);
        assert_eq!(config.parallel_flag(), "");
        assert_eq!(config.quiet_flag(), "");
    }

    #[test]
    fn test_major_four_qualifies() {
        let config = resolve_with_processors("arm64-darwin23", &reporting("4.0.0"), || 2);
        assert!(config.has_parallelism());
    }

    #[test]
    fn test_unparsable_version() {
        for text in ["unknown", "", "cmake version 3.12"] {
            let query = move || -> Result<String, ResolveError> { Ok(text.to_string()) };
            let config = resolve_with_processors("x86_64-linux", &query, || 4);
            assert_eq!(config, BuildConfig::default());
        }
    }

    #[test]
    fn test_query_failure_is_swallowed() {
        let missing =
            || -> Result<String, ResolveError> { Err(ResolveError::unavailable("cmake", "not found in PATH")) };
        assert_eq!(
            resolve_with_processors("x86_64-linux", &missing, || 4),
            BuildConfig::default()
        );

        let failing = || -> Result<String, ResolveError> {
            Err(ResolveError::ExternalToolFailed {
                tool: "cmake --version".to_string(),
                status: Some(1),
                stderr: "boom".to_string(),
            })
        };
        assert_eq!(
            resolve_with_processors("x86_64-linux", &failing, || 4),
            BuildConfig::default()
        );
    }

    #[test]
    fn test_non_ascii_digits_do_not_hide_version() {
        let query = reporting("cmake version 3.27.4 (vendor build \u{663}.\u{661}.\u{660})");
        let config = resolve_with_processors("x86_64-linux", &query, || 4);
        assert_eq!(config.parallel_flag(), "--parallel 4 ");
        assert_eq!(config.quiet_flag(), "-- --quiet ");
    }

    #[test]
    fn test_processor_count_embedded() {
        let config = resolve_with_processors("x86_64-linux", &reporting("3.20.1"), || 8);
        assert!(config.parallel_flag().contains('8'));
    }

    #[test]
    fn test_zero_processors() {
        let config = resolve_with_processors("x86_64-linux", &reporting("3.20.1"), || 0);
        assert_eq!(config.parallel_flag(), "--parallel 0 ");
        assert_eq!(config.quiet_flag(), "-- --quiet ");
    }

    #[test]
    fn test_processors_not_queried_when_unsupported() {
        let asked = Cell::new(false);
        resolve_with_processors("x86_64-linux", &reporting("3.5.1"), || {
            asked.set(true);
            8
        });
        assert!(!asked.get());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let query = reporting("cmake version 3.22.1");
        let first = resolve_with_processors("x86_64-linux", &query, || 6);
        let second = resolve_with_processors("x86_64-linux", &query, || 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_defaults_untouched() {
        let config = resolve_with_processors("x86_64-linux", &reporting("3.22.1"), || 6);
        assert!(!config.debug());
        assert!(!config.dynamic());
        assert!(!config.executable());
        assert!(config.use_alternate_generator());
    }

    #[test]
    fn test_missing_cmake_binary() {
        let query = CMakeVersionQuery::with_program("/nonexistent/acme-build/cmake");
        assert!(matches!(
            query.query(),
            Err(ResolveError::ExternalToolUnavailable { .. })
        ));
    }
}
