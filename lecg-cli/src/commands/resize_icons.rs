//! Resize-icons command - Generate 32px and 16px ribbon icons from artwork
//!
//! Two directory layouts are supported: `repo` reads
//! `<root>/design/full-size` and writes `<root>/src/Resources/Images`;
//! `legacy` uses the absolute paths of the original build machine.
//! `--source` and `--dest` override either one.

use crate::config::LecgConfig;
use crate::output::{ErrorMessage, Output, OutputFormat, TableDisplay};
use lecg_tools::icons::{resize_all_with, IconDirs, PathLayout, ResizeReport};
use std::path::PathBuf;

/// Directory layout selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// Paths relative to the repository root
    Repo,
    /// Absolute paths under C:\LECG\RevitAddins\LECG
    Legacy,
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "repo" => Ok(Layout::Repo),
            "legacy" => Ok(Layout::Legacy),
            _ => Err(format!("Unknown icon layout: '{}'", s)),
        }
    }
}

impl TableDisplay for ResizeReport {
    fn to_table(&self) -> String {
        self.events
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Directory overrides given on the command line
#[derive(Debug, Default)]
pub struct DirArgs<'a> {
    pub layout: Option<Layout>,
    pub repo_root: Option<&'a str>,
    pub source: Option<&'a str>,
    pub dest: Option<&'a str>,
}

/// Flag > config > default. An unknown layout in the config file is logged
/// and ignored.
fn resolve_dirs(args: &DirArgs<'_>, config: &LecgConfig) -> IconDirs {
    let icons = &config.icons;

    let layout = args.layout.unwrap_or_else(|| {
        icons
            .layout
            .as_deref()
            .and_then(|name| {
                name.parse::<Layout>()
                    .map_err(|e| tracing::warn!("Ignoring [icons].layout: {}", e))
                    .ok()
            })
            .unwrap_or(Layout::Repo)
    });

    let layout = match layout {
        Layout::Legacy => PathLayout::Legacy,
        Layout::Repo => PathLayout::Repo {
            root: PathBuf::from(args.repo_root.or(icons.repo_root.as_deref()).unwrap_or(".")),
        },
    };

    let mut dirs = layout.dirs();
    if let Some(source) = args.source.or(icons.source_dir.as_deref()) {
        dirs.source = PathBuf::from(source);
    }
    if let Some(dest) = args.dest.or(icons.dest_dir.as_deref()) {
        dirs.dest = PathBuf::from(dest);
    }
    dirs
}

/// Run the resize-icons command
pub fn run(
    args: DirArgs<'_>,
    strict: bool,
    config: &LecgConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dirs = resolve_dirs(&args, config);
    tracing::info!(
        "Resizing icons from {} into {}",
        dirs.source.display(),
        dirs.dest.display()
    );

    // Table output is printed line by line as the run progresses; JSON is
    // rendered once at the end.
    let streaming = format == OutputFormat::Table;
    let result = resize_all_with(&dirs, |event| {
        if streaming {
            println!("{}", event);
        }
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            Output::new(ErrorMessage::new(&e), format).render()?;
            if strict {
                return Err(e.into());
            }
            return Ok(());
        }
    };

    let failed = report.failed();
    if !streaming {
        Output::new(report, format).render()?;
    }

    if strict && failed > 0 {
        anyhow::bail!("{} icon(s) failed to process", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lecg_tools::icons::{LEGACY_DEST_DIR, LEGACY_SOURCE_DIR};
    use std::path::Path;

    #[test]
    fn test_default_is_repo_layout_in_cwd() {
        let dirs = resolve_dirs(&DirArgs::default(), &LecgConfig::default());
        assert_eq!(dirs.source, Path::new("./design/full-size"));
        assert_eq!(dirs.dest, Path::new("./src/Resources/Images"));
    }

    #[test]
    fn test_legacy_layout() {
        let args = DirArgs {
            layout: Some(Layout::Legacy),
            ..Default::default()
        };
        let dirs = resolve_dirs(&args, &LecgConfig::default());
        assert_eq!(dirs.source, PathBuf::from(LEGACY_SOURCE_DIR));
        assert_eq!(dirs.dest, PathBuf::from(LEGACY_DEST_DIR));
    }

    #[test]
    fn test_config_then_flag_overrides() {
        let config: LecgConfig = toml::from_str(
            r#"
[icons]
layout = "legacy"
dest_dir = "config-dest"
"#,
        )
        .unwrap();

        let dirs = resolve_dirs(&DirArgs::default(), &config);
        assert_eq!(dirs.source, PathBuf::from(LEGACY_SOURCE_DIR));
        assert_eq!(dirs.dest, PathBuf::from("config-dest"));

        let args = DirArgs {
            layout: Some(Layout::Repo),
            repo_root: Some("root"),
            dest: Some("flag-dest"),
            ..Default::default()
        };
        let dirs = resolve_dirs(&args, &config);
        assert_eq!(dirs.source, Path::new("root/design/full-size"));
        assert_eq!(dirs.dest, PathBuf::from("flag-dest"));
    }

    #[test]
    fn test_bad_config_layout_falls_back_to_repo() {
        let config: LecgConfig = toml::from_str("[icons]\nlayout = \"flat\"\n").unwrap();
        let dirs = resolve_dirs(&DirArgs::default(), &config);
        assert_eq!(dirs.source, Path::new("./design/full-size"));
    }
}
