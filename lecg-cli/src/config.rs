//! Configuration loading from `.lecgrc.toml`.
//!
//! Every setting is optional. Command-line flags override the file, and the
//! file overrides the built-in defaults (which reproduce the paths the tools
//! have always used).
//!
//! # Example Configuration
//!
//! ```toml
//! [build]
//! program = "dotnet"
//! project = "LECG/LECG.csproj"
//!
//! [log]
//! path = "full_build.log"
//! encoding = "utf16"
//!
//! [icons]
//! layout = "repo"          # or "legacy"
//! repo_root = "."
//! # source_dir = "design/full-size"
//! # dest_dir = "src/Resources/Images"
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".lecgrc.toml";

/// Root configuration structure loaded from `.lecgrc.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LecgConfig {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub icons: IconsConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

/// `[build]`: how the add-in is built.
#[derive(Debug, Deserialize, Default)]
pub struct BuildConfig {
    /// Build tool executable. Default: `dotnet`.
    #[serde(default)]
    pub program: Option<String>,

    /// Project or solution passed to `dotnet build`.
    #[serde(default)]
    pub project: Option<String>,
}

/// `[log]`: which build log is scanned.
#[derive(Debug, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub path: Option<String>,

    /// `utf16` (default) or `utf8`.
    #[serde(default)]
    pub encoding: Option<String>,
}

/// `[icons]`: where icon artwork lives.
#[derive(Debug, Deserialize, Default)]
pub struct IconsConfig {
    /// `repo` (default) or `legacy`.
    #[serde(default)]
    pub layout: Option<String>,

    /// Root for the `repo` layout. Default: working directory.
    #[serde(default)]
    pub repo_root: Option<String>,

    /// Overrides the layout's source directory.
    #[serde(default)]
    pub source_dir: Option<String>,

    /// Overrides the layout's destination directory.
    #[serde(default)]
    pub dest_dir: Option<String>,
}

/// `[output]`: defaults for rendering. `--format` overrides these.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Force colors on or off. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

impl LecgConfig {
    /// Load configuration from `.lecgrc.toml` in the given directory.
    ///
    /// A missing file gives defaults. Read or parse errors are logged as
    /// warnings and also give defaults.
    pub fn load(root: &Path) -> Self {
        match Self::load_strict(root) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring {}: {:#}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    /// Like [`LecgConfig::load`], but read and parse errors are returned.
    pub fn load_strict(root: &Path) -> anyhow::Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!("Loaded {}", config_path.display());
        Ok(config)
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Color override, or `None` to auto-detect.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
