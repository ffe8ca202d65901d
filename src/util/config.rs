//! Build configuration and the providers that produce it.
//!
//! A build takes its [`BuildConfig`] from the first provider that has one:
//! 1. Project override: `acme-build.toml` in the project's parent directory
//! 2. User override: `<config dir>/acme-build/build.toml`
//! 3. Detected defaults: platform and CMake version inspection
//!
//! Override files replace detection entirely. Keys they leave out take the
//! static defaults, not detected values.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::{resolve, VersionQuery};

/// Literal passed to `cmake --build` ahead of native tool arguments.
pub const QUIET_FLAG: &str = "-- --quiet ";

/// File name of a project override.
pub const OVERRIDE_FILE_NAME: &str = "acme-build.toml";

/// Options for one build invocation.
///
/// The parallel and quiet flags are either both set or both empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    debug: bool,
    dynamic: bool,
    executable: bool,
    use_alternate_generator: bool,
    parallel_flag: String,
    quiet_flag: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            debug: false,
            dynamic: false,
            executable: false,
            use_alternate_generator: true,
            parallel_flag: String::new(),
            quiet_flag: String::new(),
        }
    }
}

impl BuildConfig {
    /// Set both the parallel and quiet flags for `jobs` parallel jobs.
    pub fn with_parallelism(mut self, jobs: usize) -> Self {
        self.parallel_flag = format!("--parallel {} ", jobs);
        self.quiet_flag = QUIET_FLAG.to_string();
        self
    }

    /// Build with debug information.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build a shared library instead of a static one.
    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Also build the test executables.
    pub fn with_executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    /// Use the NMake generator on Windows.
    pub fn with_alternate_generator(mut self, enabled: bool) -> Self {
        self.use_alternate_generator = enabled;
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn executable(&self) -> bool {
        self.executable
    }

    pub fn use_alternate_generator(&self) -> bool {
        self.use_alternate_generator
    }

    /// `--parallel <N> ` or empty.
    pub fn parallel_flag(&self) -> &str {
        &self.parallel_flag
    }

    /// `-- --quiet ` or empty.
    pub fn quiet_flag(&self) -> &str {
        &self.quiet_flag
    }

    /// Check whether the parallel and quiet flags are set.
    pub fn has_parallelism(&self) -> bool {
        !self.parallel_flag.is_empty() && !self.quiet_flag.is_empty()
    }

    /// CMake build type implied by `debug`.
    pub fn build_type(&self) -> &'static str {
        if self.debug {
            "Debug"
        } else {
            "Release"
        }
    }

    /// Load a configuration from a TOML file.
    ///
    /// Files setting only one of `parallel_flag` and `quiet_flag` are
    /// rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read build config: {}", path.display()))?;

        let config: BuildConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse build config: {}", path.display()))?;

        let parallel_set = !config.parallel_flag.trim().is_empty();
        let quiet_set = !config.quiet_flag.trim().is_empty();
        if parallel_set != quiet_set {
            bail!(
                "invalid build config {}: `parallel_flag` and `quiet_flag` must be set together",
                path.display()
            );
        }

        Ok(config)
    }
}

/// A source of build configuration.
pub trait ConfigProvider {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Produce a configuration, or `None` to defer to the next provider.
    fn provide(&self) -> Result<Option<BuildConfig>>;
}

/// Configuration read from an override file, if the file exists.
#[derive(Debug, Clone)]
pub struct OverrideFile {
    path: PathBuf,
}

impl OverrideFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OverrideFile { path: path.into() }
    }
}

impl ConfigProvider for OverrideFile {
    fn name(&self) -> &str {
        "override file"
    }

    fn provide(&self) -> Result<Option<BuildConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        BuildConfig::load(&self.path).map(Some)
    }
}

/// Configuration computed from the platform id and the build tool's version.
pub struct DetectedDefaults<Q> {
    platform_id: String,
    query: Q,
}

impl<Q: VersionQuery> DetectedDefaults<Q> {
    pub fn new(platform_id: impl Into<String>, query: Q) -> Self {
        DetectedDefaults {
            platform_id: platform_id.into(),
            query,
        }
    }
}

impl<Q: VersionQuery> ConfigProvider for DetectedDefaults<Q> {
    fn name(&self) -> &str {
        "detected defaults"
    }

    fn provide(&self) -> Result<Option<BuildConfig>> {
        Ok(Some(resolve(&self.platform_id, &self.query)))
    }
}

/// Providers tried in order; the first to answer wins.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        ProviderChain::default()
    }

    /// Append a provider with lower priority than those already added.
    pub fn with(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Ask each provider in turn. Falls back to [`BuildConfig::default`] if
    /// none answers; a provider error stops the chain.
    pub fn resolve(&self) -> Result<BuildConfig> {
        for provider in &self.providers {
            if let Some(config) = provider
                .provide()
                .with_context(|| format!("{} failed", provider.name()))?
            {
                tracing::debug!("build config from {}", provider.name());
                return Ok(config);
            }
        }

        tracing::debug!("no provider answered, using static defaults");
        Ok(BuildConfig::default())
    }
}

/// Get the project override path (`<project>/../acme-build.toml`).
///
/// The project root is made absolute first so that `.` and `sub/..` still
/// point at the real parent directory.
pub fn project_override_path(project_root: &Path) -> PathBuf {
    let root = project_root
        .canonicalize()
        .or_else(|_| std::path::absolute(project_root))
        .unwrap_or_else(|_| project_root.to_path_buf());

    root.parent().unwrap_or(&root).join(OVERRIDE_FILE_NAME)
}

/// Get the user override path (`<config dir>/acme-build/build.toml`).
pub fn user_override_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "acme", "acme-build")
        .map(|dirs| dirs.config_dir().join("build.toml"))
}

/// The standard chain for a project: project override, user override, then
/// detection.
pub fn default_chain(
    project_root: &Path,
    platform_id: &str,
    query: impl VersionQuery + 'static,
) -> ProviderChain {
    let mut chain =
        ProviderChain::new().with(OverrideFile::new(project_override_path(project_root)));

    if let Some(path) = user_override_path() {
        chain = chain.with(OverrideFile::new(path));
    }

    chain.with(DetectedDefaults::new(platform_id, query))
}
