//! Output formatting module for the LECG CLI
//!
//! Commands produce a serializable result and render it either as the plain
//! text lines a human reads (table format) or as JSON for scripts.
//!
//! Automatically detects TTY context to decide whether colors are used.

use clap::ValueEnum;
use serde::Serialize;
use std::io::IsTerminal;
use std::str::FromStr;

mod json;

pub use self::json::JsonOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// The output format to use
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with the specified format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
        }
    }

    /// Create an OutputConfig with automatic TTY detection and optional color override.
    ///
    /// When stdout is not a TTY colors are disabled unless `color_override`
    /// is `Some(true)`.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        Self {
            format,
            no_color: !color_override.unwrap_or(is_tty),
        }
    }

    /// Check if colors should be used
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }
}

/// Types that have a plain-text rendering.
pub trait TableDisplay: Serialize {
    /// Convert to text; an empty string prints nothing.
    fn to_table(&self) -> String;
}

/// Result wrapper for formatted output with automatic format selection
pub struct Output<T> {
    data: T,
    config: OutputConfig,
}

impl<T: TableDisplay> Output<T> {
    /// Create a new output wrapper with specified format
    pub fn new(data: T, format: OutputFormat) -> Self {
        Self {
            data,
            config: OutputConfig::new(format),
        }
    }

    /// Get the rendered string without printing
    pub fn render_to_string(&self) -> String {
        match self.config.format {
            OutputFormat::Table => self.data.to_table(),
            OutputFormat::Json => JsonOutput::format(&self.data, &self.config),
        }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        let rendered = self.render_to_string();
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
        Ok(())
    }
}

/// A one-line diagnostic printed instead of a result.
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub error: String,
    /// Text shown in table format, e.g. `Error: ...`.
    #[serde(skip)]
    pub display: String,
}

impl ErrorMessage {
    pub fn new(error: impl std::fmt::Display) -> Self {
        let error = error.to_string();
        Self {
            display: error.clone(),
            error,
        }
    }

    pub fn with_prefix(prefix: &str, error: impl std::fmt::Display) -> Self {
        let error = error.to_string();
        Self {
            display: format!("{}: {}", prefix, error),
            error,
        }
    }
}

impl TableDisplay for ErrorMessage {
    fn to_table(&self) -> String {
        use colored::Colorize;
        self.display.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Lines(Vec<String>);

    impl TableDisplay for Lines {
        fn to_table(&self) -> String {
            self.0.join("\n")
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_table_and_json() {
        let data = Lines(vec!["Line 1: warning".to_string()]);
        assert_eq!(
            Output::new(data, OutputFormat::Table).render_to_string(),
            "Line 1: warning"
        );

        let data = Lines(vec!["a".to_string()]);
        let json = Output::new(data, OutputFormat::Json).render_to_string();
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_error_message_prefix() {
        colored::control::set_override(false);
        let msg = ErrorMessage::with_prefix("Error", "program not found");
        assert_eq!(msg.to_table(), "Error: program not found");
        assert_eq!(msg.error, "program not found");

        let json = Output::new(msg, OutputFormat::Json).render_to_string();
        assert!(json.contains("\"error\""));
        assert!(!json.contains("display"));
    }
}
