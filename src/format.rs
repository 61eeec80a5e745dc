use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Container format of a media file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaFormat {
    Mp4,
    Mkv,
    Unsupported,
}

impl MediaFormat {
    /// Map a path's extension to a container format. Never touches the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => MediaFormat::Unsupported,
        }
    }

    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "mp4" => MediaFormat::Mp4,
            "mkv" => MediaFormat::Mkv,
            _ => MediaFormat::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaFormat::Unsupported)
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaFormat::Mp4 => write!(f, "MP4"),
            MediaFormat::Mkv => write!(f, "MKV"),
            MediaFormat::Unsupported => write!(f, "unsupported"),
        }
    }
}
