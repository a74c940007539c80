//! Build command - Run the add-in build and print what it reported
//!
//! Invokes `dotnet build <project> --no-incremental /clp:WarningsOnly`,
//! waits for it to finish and prints the captured stdout and stderr. The
//! exit code is shown in JSON output but does not change this command's
//! own status unless `--strict` is given.

use crate::config::LecgConfig;
use crate::output::{ErrorMessage, Output, OutputFormat, TableDisplay};
use lecg_tools::build_runner::{BuildCommand, BuildOutput, DEFAULT_PROJECT};
use serde::Serialize;
use std::path::Path;

/// Captured build output plus the outcome of `--save-log`, rendered as one
/// document.
#[derive(Debug, Serialize)]
struct BuildReport {
    #[serde(flatten)]
    output: BuildOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_log_error: Option<String>,
}

impl TableDisplay for BuildReport {
    fn to_table(&self) -> String {
        use colored::Colorize;

        let mut text = format!("STDOUT: {}\nSTDERR: {}", self.output.stdout, self.output.stderr);
        if let Some(error) = &self.save_log_error {
            text.push('\n');
            text.push_str(&format!("Error: {}", error).red().to_string());
        }
        text
    }
}

/// Resolve the command line: flag > config > default.
fn resolve_command(project: Option<&str>, program: Option<&str>, config: &LecgConfig) -> BuildCommand {
    let project = project
        .or(config.build.project.as_deref())
        .unwrap_or(DEFAULT_PROJECT);
    let command = BuildCommand::dotnet(project);

    match program.or(config.build.program.as_deref()) {
        Some(program) => command.with_program(program),
        None => command,
    }
}

/// Run the build command
pub fn run(
    project: Option<&str>,
    program: Option<&str>,
    save_log: Option<&str>,
    strict: bool,
    config: &LecgConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let command = resolve_command(project, program, config);
    tracing::info!("Building: {}", command.display());

    let output = match command.run() {
        Ok(output) => output,
        Err(e) => {
            Output::new(ErrorMessage::with_prefix("Error", &e), format).render()?;
            if strict {
                return Err(e.into());
            }
            return Ok(());
        }
    };

    let exit_code = output.exit_code;
    let save_error = save_log.and_then(|path| output.save_log(Path::new(path)).err());
    if let Some(e) = &save_error {
        tracing::warn!("{}", e);
    }

    let report = BuildReport {
        output,
        save_log_error: save_error.as_ref().map(ToString::to_string),
    };
    Output::new(report, format).render()?;

    if let Some(e) = save_error {
        if strict {
            return Err(e.into());
        }
    }

    if strict && exit_code != Some(0) {
        anyhow::bail!("Build exited with status {:?}", exit_code);
    }
    Ok(())
}
