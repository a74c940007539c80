//! Scan-log command - List the warning lines of a build log

use crate::config::LecgConfig;
use crate::output::{ErrorMessage, Output, OutputFormat, TableDisplay};
use lecg_tools::log_scan::{scan_file, LogEncoding, WarningLine, DEFAULT_LOG_PATH};
use serde::Serialize;
use std::path::PathBuf;

/// Warnings found in one log file
#[derive(Debug, Serialize)]
pub struct WarningReport {
    pub path: PathBuf,
    pub encoding: LogEncoding,
    pub warnings: Vec<WarningLine>,
}

impl TableDisplay for WarningReport {
    fn to_table(&self) -> String {
        self.warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flag > config > default. An unknown encoding in the config file is
/// logged and ignored.
fn resolve(
    path: Option<&str>,
    encoding: Option<LogEncoding>,
    config: &LecgConfig,
) -> (PathBuf, LogEncoding) {
    let path = path
        .or(config.log.path.as_deref())
        .unwrap_or(DEFAULT_LOG_PATH);

    let encoding = encoding.unwrap_or_else(|| {
        config
            .log
            .encoding
            .as_deref()
            .and_then(|name| {
                name.parse::<LogEncoding>()
                    .map_err(|e| tracing::warn!("Ignoring [log].encoding: {}", e))
                    .ok()
            })
            .unwrap_or_default()
    });

    (PathBuf::from(path), encoding)
}

/// Run the scan-log command
pub fn run(
    path: Option<&str>,
    encoding: Option<LogEncoding>,
    strict: bool,
    config: &LecgConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (path, encoding) = resolve(path, encoding, config);
    tracing::info!("Scanning {} as {}", path.display(), encoding);

    match scan_file(&path, encoding) {
        Ok(warnings) => Output::new(
            WarningReport {
                path,
                encoding,
                warnings,
            },
            format,
        )
        .render(),
        Err(e) => {
            Output::new(ErrorMessage::new(&e), format).render()?;
            if strict {
                return Err(e.into());
            }
            Ok(())
        }
    }
}
