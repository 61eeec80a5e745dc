//! Cover images and their JPEG encoding.
//!
//! The MP4 path embeds encoded bytes directly; the MKV path needs a file on
//! disk, which is handed out as a [`TemporaryImage`] guard that removes the
//! file when dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tempfile::{Builder, TempPath};
use tracing::debug;

use crate::config::ImageConfig;
use crate::error::{Result, CinetagError};

/// Caller-owned poster bitmap
#[derive(Debug, Clone)]
pub struct CoverImage {
    image: DynamicImage,
}

impl CoverImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode a poster image file (JPEG or PNG)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CinetagError::FileNotFound(path.display().to_string()));
        }

        let image = image::open(path)
            .map_err(|e| CinetagError::Encode(format!("Failed to decode {}: {}", path.display(), e)))?;
        Ok(Self { image })
    }

    /// Decode poster bytes already held in memory, e.g. a downloaded poster
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| CinetagError::Encode(format!("Failed to decode image data: {}", e)))?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &DynamicImage {
        &self.image
    }
}

impl From<DynamicImage> for CoverImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// JPEG file on disk that is deleted when the guard goes out of scope
#[derive(Debug)]
pub struct TemporaryImage {
    path: TempPath,
}

impl TemporaryImage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Encodes cover images to JPEG
#[derive(Debug, Clone)]
pub struct ImageEncoder {
    quality: u8,
    temp_dir: Option<PathBuf>,
}

impl ImageEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality,
            temp_dir: None,
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            quality: config.jpeg_quality,
            temp_dir: config.temp_dir.clone(),
        }
    }

    /// Create temporary files in `dir` instead of the system temp directory
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Encode the image to an in-memory JPEG byte stream
    pub fn encode(&self, cover: &CoverImage) -> Result<Vec<u8>> {
        let image = cover.as_image();
        if image.width() == 0 || image.height() == 0 {
            return Err(CinetagError::Encode(format!(
                "Cannot encode a {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let mut data = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut data, self.quality);

        // JPEG carries neither alpha nor 16-bit samples
        let result = match image {
            DynamicImage::ImageLuma8(gray) => encoder.encode_image(gray),
            other => encoder.encode_image(&other.to_rgb8()),
        };
        result.map_err(|e| CinetagError::Encode(format!("JPEG encoding failed: {}", e)))?;

        debug!("Encoded {}x{} cover as {} bytes of JPEG", image.width(), image.height(), data.len());
        Ok(data)
    }

    /// Encode the image into a freshly created, uniquely named `.jpg` file
    pub fn encode_to_temporary_file(&self, cover: &CoverImage) -> Result<TemporaryImage> {
        let data = self.encode(cover)?;

        let mut builder = Builder::new();
        builder.prefix("cinetag-cover-").suffix(".jpg");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        // On failure `file` is dropped here, which removes the partial file
        file.write_all(&data)?;
        file.flush()?;

        let path = file.into_temp_path();
        debug!("Wrote temporary cover image: {}", path.display());
        Ok(TemporaryImage { path })
    }
}
