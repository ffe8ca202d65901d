//! Downstream build invocation.

pub mod cmake;

pub use cmake::{is_cmake_project, CMakeInvocation};
