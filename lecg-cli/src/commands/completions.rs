//! Shell completions command - Generate shell completion scripts
//!
//! Generates completion scripts for bash, zsh, fish and PowerShell, or prints
//! instructions for installing them.

use std::io;

use clap::Command;
use clap_complete::{generate, shells};
use colored::Colorize;
use serde::Serialize;

use crate::output::{Output, OutputFormat, TableDisplay};

const BIN_NAME: &str = "lecg";

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
            Shell::Zsh => write!(f, "zsh"),
            Shell::Fish => write!(f, "fish"),
            Shell::PowerShell => write!(f, "powershell"),
        }
    }
}

/// Instructions for installing completions
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub instructions: Vec<String>,
}

impl TableDisplay for CompletionInstructions {
    fn to_table(&self) -> String {
        let mut output = format!(
            "{} completions for {}\n\n{}\n",
            BIN_NAME.cyan().bold(),
            self.shell.yellow(),
            "Installation:".cyan().bold()
        );
        for instruction in &self.instructions {
            output.push_str(&format!("  {}\n", instruction));
        }
        output
    }
}

/// Get installation instructions for a shell
fn get_instructions(shell: Shell) -> Vec<String> {
    let lines: &[&str] = match shell {
        Shell::Bash => &[
            "# Add to ~/.bashrc:",
            "eval \"$(lecg completions bash)\"",
        ],
        Shell::Zsh => &[
            "# Save to a file in fpath:",
            "lecg completions zsh > ~/.zfunc/_lecg",
            "# Then add to ~/.zshrc before compinit:",
            "fpath=(~/.zfunc $fpath)",
        ],
        Shell::Fish => &[
            "# Save to fish completions directory:",
            "lecg completions fish > ~/.config/fish/completions/lecg.fish",
        ],
        Shell::PowerShell => &[
            "# Add to $PROFILE:",
            "Invoke-Expression (& lecg completions powershell | Out-String)",
        ],
    };
    lines.iter().map(|l| l.to_string()).collect()
}

/// Generate completions for `cmd` and write them to stdout
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let mut out = io::stdout();
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, &mut out),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, &mut out),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, &mut out),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, &mut out),
    }
}

/// Print installation instructions for `shell`
pub fn run_instructions(shell: Shell, format: OutputFormat) -> anyhow::Result<()> {
    let instructions = CompletionInstructions {
        shell: shell.to_string(),
        instructions: get_instructions(shell),
    };
    Output::new(instructions, format).render()
}
