//! Log scanner: find warning lines in a captured build log.
//!
//! Build logs redirected from a Windows shell are usually UTF-16, so that is
//! the default decoding. Matching is a plain case-insensitive substring test.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, ToolError};

/// Log file read when no path is given, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "full_build.log";

/// Token a line must contain (ignoring case) to be reported.
pub const WARNING_TOKEN: &str = "warning";

/// Text encodings the scanner understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    /// UTF-16 with optional BOM, little-endian when no BOM is present.
    #[default]
    Utf16,
    Utf8,
}

impl LogEncoding {
    pub fn name(self) -> &'static str {
        match self {
            LogEncoding::Utf16 => "utf-16",
            LogEncoding::Utf8 => "utf-8",
        }
    }
}

impl fmt::Display for LogEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "utf16" => Ok(LogEncoding::Utf16),
            "utf8" => Ok(LogEncoding::Utf8),
            _ => Err(format!("Unknown log encoding: '{}'", s)),
        }
    }
}

/// A matching line and its zero-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningLine {
    pub index: usize,
    /// Line content with surrounding whitespace removed.
    pub content: String,
}

impl fmt::Display for WarningLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.index, self.content)
    }
}

/// Read `path`, decode it and return every warning line in file order.
pub fn scan_file(path: &Path, encoding: LogEncoding) -> Result<Vec<WarningLine>> {
    let bytes = fs::read(path).map_err(|e| ToolError::io(path, e))?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let text = decode(&bytes, encoding).map_err(|message| ToolError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.name(),
        message,
    })?;

    let matches = scan_text(&text);
    tracing::debug!("{} warning line(s) in {}", matches.len(), path.display());
    Ok(matches)
}

/// Return every line of `text` containing the warning token.
pub fn scan_text(text: &str) -> Vec<WarningLine> {
    split_lines(text)
        .enumerate()
        .filter(|(_, line)| is_warning(line))
        .map(|(index, line)| WarningLine {
            index,
            content: line.trim().to_string(),
        })
        .collect()
}

/// Case-insensitive substring test for [`WARNING_TOKEN`].
pub fn is_warning(line: &str) -> bool {
    line.to_lowercase().contains(WARNING_TOKEN)
}

/// Split on `\n`, `\r\n` and lone `\r`. A trailing terminator does not
/// start another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(pos) => {
                let line = &rest[..pos];
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn decode(bytes: &[u8], encoding: LogEncoding) -> std::result::Result<String, String> {
    match encoding {
        LogEncoding::Utf8 => {
            let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string())
        }
        LogEncoding::Utf16 => decode_utf16(bytes),
    }
}

fn decode_utf16(bytes: &[u8]) -> std::result::Result<String, String> {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        return Err(format!("truncated data: odd number of bytes ({})", body.len()));
    }

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        })
        .collect();

    String::from_utf16(&units).map_err(|e| e.to_string())
}
