//! LECG CLI - build-support tools for the LECG Revit add-in
//!
//! Runs the add-in build, scans build logs for warnings and regenerates the
//! ribbon icons from full-size artwork.

use clap::{CommandFactory, Parser, Subcommand};
use lecg_tools::log_scan::LogEncoding;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::LecgConfig;
use output::{OutputConfig, OutputFormat};

/// Build-support tools for the LECG Revit add-in.
#[derive(Parser)]
#[command(name = "lecg")]
#[command(author, version)]
#[command(about = "Build-support tools for the LECG Revit add-in")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  lecg build                       Build with warnings-only output
  lecg build --save-log full_build.log
  lecg scan-log                    List warnings in full_build.log
  lecg resize-icons                Regenerate ribbon icons")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run `dotnet build --no-incremental /clp:WarningsOnly` and print its output
    #[command(visible_alias = "b")]
    Build {
        /// Project or solution to build
        project: Option<String>,

        /// Build tool executable (default: dotnet)
        #[arg(long)]
        program: Option<String>,

        /// Also write captured stdout to this file as UTF-16
        #[arg(long, value_name = "PATH")]
        save_log: Option<String>,

        /// Exit non-zero if the build cannot run or reports failure
        #[arg(long)]
        strict: bool,
    },

    /// Print every line of a build log that mentions "warning"
    #[command(visible_alias = "scan")]
    ScanLog {
        /// Log file (default: full_build.log)
        #[arg(short, long)]
        path: Option<String>,

        /// Text encoding of the log: utf16 or utf8 (default: utf16)
        #[arg(short, long)]
        encoding: Option<LogEncoding>,

        /// Exit non-zero if the log cannot be read
        #[arg(long)]
        strict: bool,
    },

    /// Resize the full-size artwork into 32px and 16px ribbon icons
    #[command(visible_alias = "icons")]
    ResizeIcons {
        /// Directory layout to use (default: repo)
        #[arg(short, long, value_enum)]
        layout: Option<resize_icons::Layout>,

        /// Repository root for the repo layout (default: current directory)
        #[arg(long)]
        repo_root: Option<String>,

        /// Override the artwork directory
        #[arg(long)]
        source: Option<String>,

        /// Override the output directory
        #[arg(long)]
        dest: Option<String>,

        /// Exit non-zero if any icon fails to process
        #[arg(long)]
        strict: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: completions::Shell,

        /// Show installation instructions instead of generating completions
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("lecg {}", cli_version);
    println!("  {:<12} {}", "lecg-cli:".cyan(), cli_version);
    println!("  {:<12} {}", "lecg-tools:".cyan(), lecg_tools::VERSION);
    println!("  {:<12} {}", "Platform:".cyan(), platform);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version_verbose {
        print_verbose_version();
        return Ok(());
    }

    setup_logging(cli.verbose, cli.quiet);

    let config = LecgConfig::load(std::path::Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let output_config = OutputConfig::auto_detect_with_color_override(format, config.use_color());
    colored::control::set_override(output_config.use_colors());

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Build {
            project,
            program,
            save_log,
            strict,
        } => build::run(
            project.as_deref(),
            program.as_deref(),
            save_log.as_deref(),
            strict,
            &config,
            format,
        ),
        Commands::ScanLog {
            path,
            encoding,
            strict,
        } => scan_log::run(path.as_deref(), encoding, strict, &config, format),
        Commands::ResizeIcons {
            layout,
            repo_root,
            source,
            dest,
            strict,
        } => {
            let args = resize_icons::DirArgs {
                layout,
                repo_root: repo_root.as_deref(),
                source: source.as_deref(),
                dest: dest.as_deref(),
            };
            resize_icons::run(args, strict, &config, format)
        }
        Commands::Completions {
            shell,
            instructions,
        } => {
            if instructions {
                completions::run_instructions(shell, format)
            } else {
                let mut cmd = Cli::command();
                completions::generate_completions(shell, &mut cmd);
                Ok(())
            }
        }
    }
}
