//! Extraction of `major.minor.patch` numbers from tool output.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::{Comparator, Op, Prerelease, Version};

use super::errors::ResolveError;

// ASCII digits only; `\d` would also match other Unicode digit classes.
static DOTTED_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("valid version pattern"));

/// Oldest CMake accepting `--build --parallel <N>` and native tool args after `--`.
pub const MIN_PARALLEL_CMAKE: (u64, u64) = (3, 12);

/// A version number reported by an external tool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolVersion(Version);

impl ToolVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ToolVersion(Version::new(major, minor, patch))
    }

    /// Parse the last dotted triple found anywhere in `text`.
    ///
    /// `cmake --version` prints `cmake version 3.27.4` followed by a
    /// trailer line, so the number is not at a fixed position.
    pub fn parse_last(text: &str) -> Result<Self, ResolveError> {
        let found = DOTTED_TRIPLE
            .find_iter(text)
            .last()
            .ok_or_else(|| ResolveError::malformed(text.trim()))?;

        let parts: Vec<u64> = found
            .as_str()
            .split('.')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| ResolveError::malformed(found.as_str()))?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(ToolVersion::new(*major, *minor, *patch)),
            _ => Err(ResolveError::malformed(found.as_str())),
        }
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// True when this version is at least `major.minor`. The patch level is
    /// not considered.
    pub fn at_least(&self, major: u64, minor: u64) -> bool {
        let req = Comparator {
            op: Op::GreaterEq,
            major,
            minor: Some(minor),
            patch: None,
            pre: Prerelease::EMPTY,
        };
        req.matches(&self.0)
    }

    /// True when CMake at this version supports the parallel and quiet flags.
    pub fn supports_parallel_build(&self) -> bool {
        let (major, minor) = MIN_PARALLEL_CMAKE;
        self.at_least(major, minor)
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
