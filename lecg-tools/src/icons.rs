//! Icon resizer: turn full-size design artwork into ribbon button icons.
//!
//! Each source PNG in [`ICON_MAPPING`] becomes a 32×32 and a 16×16 PNG named
//! after the ribbon command it belongs to. Entries are processed one at a
//! time; a broken source file only affects its own entry.

use image::imageops::FilterType;
use image::ImageFormat;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ToolError};

/// Source filename → output basename, in processing order.
pub const ICON_MAPPING: &[(&str, &str)] = &[
    ("Align Master.png", "AlignMaster"),
    ("left.png", "AlignLeft"),
    ("center.png", "AlignCenter"),
    ("right.png", "AlignRight"),
    ("top.png", "AlignTop"),
    ("middle.png", "AlignMiddle"),
    ("bottom.png", "AlignBottom"),
    ("horizontally.png", "DistributeH"),
    ("vertically.png", "DistributeV"),
];

/// Square output sizes, in the order they are written.
pub const ICON_SIZES: [u32; 2] = [32, 16];

/// Lanczos with three lobes: slow, but keeps thin strokes legible at 16px.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

pub const LEGACY_SOURCE_DIR: &str = r"C:\LECG\RevitAddins\LECG\img\Full size images";
pub const LEGACY_DEST_DIR: &str = r"C:\LECG\RevitAddins\LECG\src\Resources\Images";

/// Where artwork is read from and icons are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLayout {
    /// Fixed absolute paths on the original build machine.
    Legacy,
    /// `<root>/design/full-size` → `<root>/src/Resources/Images`.
    Repo { root: PathBuf },
}

impl PathLayout {
    pub fn source_dir(&self) -> PathBuf {
        match self {
            PathLayout::Legacy => PathBuf::from(LEGACY_SOURCE_DIR),
            PathLayout::Repo { root } => root.join("design").join("full-size"),
        }
    }

    pub fn dest_dir(&self) -> PathBuf {
        match self {
            PathLayout::Legacy => PathBuf::from(LEGACY_DEST_DIR),
            PathLayout::Repo { root } => root.join("src").join("Resources").join("Images"),
        }
    }

    pub fn dirs(&self) -> IconDirs {
        IconDirs {
            source: self.source_dir(),
            dest: self.dest_dir(),
        }
    }
}

/// Resolved source and destination directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconDirs {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// `<basename>_<size>.png`
pub fn icon_file_name(basename: &str, size: u32) -> String {
    format!("{}_{}.png", basename, size)
}

/// What happened to one file or mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResizeEvent {
    Saved { file: String },
    SourceNotFound { path: PathBuf },
    Failed { filename: String, error: String },
}

impl fmt::Display for ResizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeEvent::Saved { file } => write!(f, "Saved {}", file),
            ResizeEvent::SourceNotFound { path } => {
                write!(f, "Source file not found: {}", path.display())
            }
            ResizeEvent::Failed { filename, error } => {
                write!(f, "Error processing {}: {}", filename, error)
            }
        }
    }
}

/// Ordered record of a resize run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResizeReport {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub events: Vec<ResizeEvent>,
}

impl ResizeReport {
    pub fn saved(&self) -> usize {
        self.count(|e| matches!(e, ResizeEvent::Saved { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|e| matches!(e, ResizeEvent::SourceNotFound { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|e| matches!(e, ResizeEvent::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ResizeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// Resize every mapped icon found in `dirs.source` into `dirs.dest`.
///
/// The destination directory is created up front; failing to create it is
/// the only error returned. Per-entry problems end up in the report.
pub fn resize_all(dirs: &IconDirs) -> Result<ResizeReport> {
    resize_all_with(dirs, |_| {})
}

/// Like [`resize_all`], but `on_event` sees each event as it happens, before
/// the next entry is touched.
pub fn resize_all_with<F>(dirs: &IconDirs, mut on_event: F) -> Result<ResizeReport>
where
    F: FnMut(&ResizeEvent),
{
    fs::create_dir_all(&dirs.dest).map_err(|e| ToolError::io(&dirs.dest, e))?;

    let mut events = Vec::new();
    let mut record = |event: ResizeEvent| {
        on_event(&event);
        events.push(event);
    };

    for &(filename, basename) in ICON_MAPPING {
        let source_path = dirs.source.join(filename);
        if !source_path.exists() {
            tracing::debug!("Skipping {}: not found", source_path.display());
            record(ResizeEvent::SourceNotFound { path: source_path });
            continue;
        }

        let result = resize_one(&source_path, &dirs.dest, basename, &mut |file| {
            record(ResizeEvent::Saved { file })
        });

        if let Err(e) = result {
            tracing::warn!("Failed to process {}: {}", filename, e);
            record(ResizeEvent::Failed {
                filename: filename.to_string(),
                error: e.to_string(),
            });
        }
    }

    let report = ResizeReport {
        source_dir: dirs.source.clone(),
        dest_dir: dirs.dest.clone(),
        events,
    };
    tracing::info!(
        "Resized icons: {} saved, {} missing, {} failed",
        report.saved(),
        report.missing(),
        report.failed()
    );
    Ok(report)
}

/// Decode `source` once and write one PNG per entry of [`ICON_SIZES`],
/// reporting each written file name to `on_saved`.
fn resize_one(
    source: &Path,
    dest_dir: &Path,
    basename: &str,
    on_saved: &mut dyn FnMut(String),
) -> Result<()> {
    let img = image::open(source).map_err(|e| ToolError::Image {
        path: source.to_path_buf(),
        source: e,
    })?;

    for size in ICON_SIZES {
        let name = icon_file_name(basename, size);
        let target = dest_dir.join(&name);
        img.resize_exact(size, size, RESAMPLE_FILTER)
            .save_with_format(&target, ImageFormat::Png)
            .map_err(|e| ToolError::Image {
                path: target.clone(),
                source: e,
            })?;
        tracing::debug!("Wrote {}", target.display());
        on_saved(name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8, 255])
        });
        img.save(path).unwrap();
    }

    fn setup(files: &[&str]) -> (TempDir, IconDirs) {
        let temp_dir = TempDir::new().unwrap();
        let dirs = PathLayout::Repo {
            root: temp_dir.path().to_path_buf(),
        }
        .dirs();
        fs::create_dir_all(&dirs.source).unwrap();
        for file in files {
            write_png(&dirs.source.join(file), 64, 48);
        }
        (temp_dir, dirs)
    }

    fn dest_files(dirs: &IconDirs) -> HashSet<String> {
        fs::read_dir(&dirs.dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_mapping_keys_and_basenames_unique() {
        let keys: HashSet<_> = ICON_MAPPING.iter().map(|(k, _)| k).collect();
        let names: HashSet<_> = ICON_MAPPING.iter().map(|(_, v)| v).collect();
        assert_eq!(ICON_MAPPING.len(), 9);
        assert_eq!(keys.len(), ICON_MAPPING.len());
        assert_eq!(names.len(), ICON_MAPPING.len());
    }

    #[test]
    fn test_repo_layout_paths() {
        let layout = PathLayout::Repo {
            root: PathBuf::from("repo"),
        };
        assert_eq!(layout.source_dir(), Path::new("repo/design/full-size"));
        assert_eq!(layout.dest_dir(), Path::new("repo/src/Resources/Images"));
    }

    #[test]
    fn test_legacy_layout_paths() {
        let dirs = PathLayout::Legacy.dirs();
        assert_eq!(dirs.source, PathBuf::from(LEGACY_SOURCE_DIR));
        assert_eq!(dirs.dest, PathBuf::from(LEGACY_DEST_DIR));
    }

    #[test]
    fn test_icon_file_name() {
        assert_eq!(icon_file_name("AlignLeft", 32), "AlignLeft_32.png");
        assert_eq!(icon_file_name("DistributeV", 16), "DistributeV_16.png");
    }

    #[test]
    fn test_event_json_shape() {
        let event = ResizeEvent::Saved {
            file: "AlignTop_32.png".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "saved");
        assert_eq!(json["file"], "AlignTop_32.png");

        let event = ResizeEvent::SourceNotFound {
            path: PathBuf::from("top.png"),
        };
        assert_eq!(serde_json::to_value(&event).unwrap()["status"], "source_not_found");
    }

    #[test]
    fn test_only_present_sources_are_resized() {
        let (_temp_dir, dirs) = setup(&["left.png", "center.png"]);
        let report = resize_all(&dirs).unwrap();

        let expected: HashSet<String> = [
            "AlignLeft_32.png",
            "AlignLeft_16.png",
            "AlignCenter_32.png",
            "AlignCenter_16.png",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(dest_files(&dirs), expected);
        assert_eq!(report.saved(), 4);
        assert_eq!(report.missing(), 7);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_event_order_follows_mapping() {
        let (_temp_dir, dirs) = setup(&["left.png"]);
        let report = resize_all(&dirs).unwrap();

        let lines: Vec<String> = report.events.iter().map(|e| e.to_string()).collect();
        assert!(lines[0].starts_with("Source file not found: "));
        assert!(lines[0].ends_with("Align Master.png"));
        assert_eq!(lines[1], "Saved AlignLeft_32.png");
        assert_eq!(lines[2], "Saved AlignLeft_16.png");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_events_are_streamed_before_next_entry() {
        let (_temp_dir, dirs) = setup(&["left.png", "right.png"]);
        let mut seen = Vec::new();
        let report = resize_all_with(&dirs, |event| {
            if let ResizeEvent::Saved { file } = event {
                // The file is on disk by the time its event arrives.
                assert!(dirs.dest.join(file).exists());
            }
            seen.push(event.clone());
        })
        .unwrap();

        assert_eq!(seen, report.events);
        assert_eq!(seen.len(), 11);
    }

    #[test]
    fn test_output_dimensions() {
        let (_temp_dir, dirs) = setup(&["top.png"]);
        resize_all(&dirs).unwrap();

        let big = image::open(dirs.dest.join("AlignTop_32.png")).unwrap();
        let small = image::open(dirs.dest.join("AlignTop_16.png")).unwrap();
        assert_eq!((big.width(), big.height()), (32, 32));
        assert_eq!((small.width(), small.height()), (16, 16));
    }

    #[test]
    fn test_creates_missing_destination() {
        let (_temp_dir, dirs) = setup(&[]);
        assert!(!dirs.dest.exists());

        let report = resize_all(&dirs).unwrap();
        assert!(dirs.dest.is_dir());
        assert_eq!(report.missing(), ICON_MAPPING.len());
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let (_temp_dir, dirs) = setup(&["bottom.png"]);
        resize_all(&dirs).unwrap();
        let first = fs::read(dirs.dest.join("AlignBottom_16.png")).unwrap();

        resize_all(&dirs).unwrap();
        let second = fs::read(dirs.dest.join("AlignBottom_16.png")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_source_is_isolated() {
        let (_temp_dir, dirs) = setup(&["left.png", "right.png"]);
        fs::write(dirs.source.join("center.png"), b"definitely not a png").unwrap();

        let report = resize_all(&dirs).unwrap();
        assert_eq!(report.failed(), 1);
        assert_eq!(report.saved(), 4);

        let failure = report
            .events
            .iter()
            .find(|e| matches!(e, ResizeEvent::Failed { .. }))
            .unwrap();
        assert!(failure.to_string().starts_with("Error processing center.png: "));
        assert!(dirs.dest.join("AlignRight_16.png").exists());
        assert!(!dirs.dest.join("AlignCenter_32.png").exists());
    }
}
