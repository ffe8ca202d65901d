//! acme-build - build options and toolbox staging for the ACME library
//!
//! This crate decides how CMake is invoked on the current host and
//! assembles the toolbox directory used for distribution.

pub mod builder;
pub mod ops;
pub mod resolver;
pub mod util;

pub use resolver::{resolve, CMakeVersionQuery, ResolveError, VersionQuery};
pub use util::config::BuildConfig;
