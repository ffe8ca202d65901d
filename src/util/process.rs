//! Subprocess execution for CMake.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// Builder for a single external command.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Get the arguments, exactly as they will be passed to the program.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run to completion, capturing stdout and stderr.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("running `{}`", self.display_command());

        cmd.output()
            .with_context(|| format!("failed to run `{}`", self.program.display()))
    }

    /// Run to completion and fail on a non-zero exit.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                stderr.trim_end()
            );
        }
        Ok(output)
    }

    /// The command line as a shell would show it. Arguments containing
    /// whitespace are double-quoted. Only used for display, so non-UTF-8
    /// bytes are replaced.
    pub fn display_command(&self) -> String {
        let mut parts = vec![quote(&self.program.display().to_string())];
        parts.extend(self.args.iter().map(|a| quote(&a.to_string_lossy())));
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake, honoring the `CMAKE` environment variable.
pub fn find_cmake() -> Option<PathBuf> {
    if let Ok(cmake) = std::env::var("CMAKE") {
        if let Some(path) = find_executable(&cmake) {
            return Some(path);
        }
    }

    find_executable("cmake")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", "build", "--parallel", "8"]);
        assert_eq!(pb.display_command(), "cmake --build build --parallel 8");
    }

    #[test]
    fn test_display_command_quotes_whitespace() {
        let pb = ProcessBuilder::new("cmake").args(["-G", "NMake Makefiles"]);
        assert_eq!(pb.display_command(), "cmake -G \"NMake Makefiles\"");
    }

    #[test]
    fn test_missing_program_fails() {
        let err = ProcessBuilder::new("/nonexistent/acme-build/tool")
            .exec()
            .unwrap_err();
        assert!(err.to_string().contains("failed to run"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_and_check_reports_failure() {
        let err = ProcessBuilder::new("sh")
            .args(["-c", "echo nope >&2; exit 3"])
            .exec_and_check()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Some(3)"));
        assert!(msg.contains("nope"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_are_preserved() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"acme-\xff.cc");
        let pb = ProcessBuilder::new("printf").args(["%s", "--"]).arg(raw);
        assert_eq!(pb.get_args()[2].as_bytes(), b"acme-\xff.cc");

        let output = ProcessBuilder::new("printf").arg("%s").arg(raw).exec().unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"acme-\xff.cc");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_captures_stdout() {
        let output = ProcessBuilder::new("echo").arg("3.12.0").exec().unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3.12.0");
    }
}
