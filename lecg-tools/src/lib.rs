//! LECG build-support tools.
//!
//! Three small, independent utilities used while developing the LECG Revit
//! add-in:
//!
//! - [`build_runner`]: run `dotnet build` with warnings-only logging and
//!   capture its output
//! - [`log_scan`]: list the warning lines of a (UTF-16) build log
//! - [`icons`]: resize the full-size ribbon artwork into 32px and 16px icons
//!
//! Every operation returns a typed [`ToolError`]; deciding whether a failure
//! stops anything is left to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use lecg_tools::icons::{resize_all, PathLayout};
//!
//! let dirs = PathLayout::Repo { root: ".".into() }.dirs();
//! let report = resize_all(&dirs)?;
//! for event in &report.events {
//!     println!("{}", event);
//! }
//! # Ok::<(), lecg_tools::ToolError>(())
//! ```

/// Version of this crate, as reported by `lecg --version-verbose`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod build_runner;
pub mod error;
pub mod icons;
pub mod log_scan;

pub use build_runner::{BuildCommand, BuildOutput};
pub use error::{Result, ToolError};
pub use icons::{resize_all, resize_all_with, IconDirs, PathLayout, ResizeEvent, ResizeReport};
pub use log_scan::{scan_file, LogEncoding, WarningLine};
