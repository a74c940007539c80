//! Build runner: invoke the add-in build and capture what it prints.
//!
//! The runner launches `dotnet build` with warnings-only console logging,
//! blocks until the process exits and hands both captured streams back as
//! text. There is no timeout and the exit code is reported, never acted on.

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::{Result, ToolError};

/// Project built when nothing else is configured.
pub const DEFAULT_PROJECT: &str = r"c:\LECG\RevitAddins\LECG\LECG.csproj";

/// Build tool executable.
pub const DEFAULT_PROGRAM: &str = "dotnet";

/// A fully resolved command line for the external build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildCommand {
    /// `dotnet build <project> --no-incremental /clp:WarningsOnly`
    pub fn dotnet(project: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec![
                "build".to_string(),
                project.into(),
                "--no-incremental".to_string(),
                "/clp:WarningsOnly".to_string(),
            ],
        }
    }

    /// Arbitrary program and arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Swap the executable, keeping the argument list.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Command line as it would be typed into a shell, for logging.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Launch the process, wait for it, and capture both streams.
    pub fn run(&self) -> Result<BuildOutput> {
        tracing::debug!("Running: {}", self.display());
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "{} finished in {}ms with status {:?}",
            self.program,
            duration_ms,
            output.status.code()
        );

        Ok(BuildOutput {
            command: self.display(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration_ms,
        })
    }
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self::dotnet(DEFAULT_PROJECT)
    }
}

/// Everything the build tool printed.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl BuildOutput {
    /// Write captured stdout as UTF-16LE with a byte-order mark, the
    /// encoding the log scanner reads by default.
    pub fn save_log(&self, path: &Path) -> Result<()> {
        let mut bytes = Vec::with_capacity(2 + self.stdout.len() * 2);
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        for unit in self.stdout.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(path, bytes).map_err(|e| ToolError::io(path, e))?;
        tracing::debug!("Saved build log to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_command_line() {
        let cmd = BuildCommand::default();
        assert_eq!(cmd.program, "dotnet");
        assert_eq!(
            cmd.args,
            vec![
                "build",
                r"c:\LECG\RevitAddins\LECG\LECG.csproj",
                "--no-incremental",
                "/clp:WarningsOnly",
            ]
        );
    }

    #[test]
    fn test_display() {
        let cmd = BuildCommand::dotnet("LECG.csproj");
        assert_eq!(
            cmd.display(),
            "dotnet build LECG.csproj --no-incremental /clp:WarningsOnly"
        );
    }

    #[test]
    fn test_with_program_keeps_args() {
        let cmd = BuildCommand::dotnet("a.csproj").with_program("/opt/dotnet/dotnet");
        assert_eq!(cmd.program, "/opt/dotnet/dotnet");
        assert_eq!(cmd.args[1], "a.csproj");
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let cmd = BuildCommand::new("lecg-definitely-not-a-real-program", ["build"]);
        let err = cmd.run().unwrap_err();
        assert!(matches!(err, ToolError::Launch { .. }));
        assert!(err
            .to_string()
            .contains("lecg-definitely-not-a-real-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_both_streams() {
        let cmd = BuildCommand::new("sh", ["-c", "echo built; echo 'warning CS0168' >&2; exit 3"]);
        let output = cmd.run().unwrap();
        assert_eq!(output.stdout, "built\n");
        assert_eq!(output.stderr, "warning CS0168\n");
        assert_eq!(output.exit_code, Some(3));
    }

    #[test]
    fn test_save_log_writes_utf16le_with_bom() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("full_build.log");
        let output = BuildOutput {
            command: "dotnet build".to_string(),
            stdout: "ok\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 0,
        };
        output.save_log(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFE, b'o', 0, b'k', 0, b'\n', 0]);
    }
}
