use std::fs::{File, OpenOptions};
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::mp4::{AtomIdent, Ilst, Mp4File};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::TagExt;
use tracing::{debug, info};

use crate::artwork::{CoverImage, ImageEncoder};
use crate::error::{Result, CinetagError};
use crate::events::EventEmitter;
use crate::handler::FormatHandler;

const COVER_ART: AtomIdent<'static> = AtomIdent::Fourcc(*b"covr");

/// Rewrites the `ilst` cover art of MP4 files in place
pub struct Mp4Handler {
    encoder: ImageEncoder,
}

impl Mp4Handler {
    pub fn new(encoder: ImageEncoder) -> Self {
        Self { encoder }
    }
}

impl FormatHandler for Mp4Handler {
    fn write(&self, path: &Path, cover: &CoverImage, events: &mut EventEmitter<'_>) -> Result<String> {
        // Parse from a read-only handle so a bad file is never opened for writing
        let mp4 = open_mp4(path)?;

        let data = self.encoder.encode(cover)?;

        let mut ilst = mp4.ilst().cloned().unwrap_or_default();
        let removed = ilst.remove(&COVER_ART).count();
        if removed > 0 {
            debug!("Removed {} existing cover art item(s) from {}", removed, path.display());
        }

        let picture = Picture::new_unchecked(PictureType::CoverFront, Some(MimeType::Jpeg), None, data);
        ilst.insert_picture(picture);

        events.progress("Saving MP4 tags...");
        save_ilst(path, &ilst)?;

        info!("Cover art written to {}", path.display());
        Ok("MP4 tags written successfully".to_string())
    }
}

/// Read the cover art currently stored in an MP4 file, in storage order
pub fn read_cover_art<P: AsRef<Path>>(path: P) -> Result<Vec<Picture>> {
    let mp4 = open_mp4(path.as_ref())?;
    let pictures = mp4
        .ilst()
        .and_then(|ilst| ilst.pictures())
        .map(|pictures| pictures.cloned().collect())
        .unwrap_or_default();
    Ok(pictures)
}

fn open_mp4(path: &Path) -> Result<Mp4File> {
    let mut file = File::open(path)?;
    let parse_options = ParseOptions::new().read_properties(false);

    Mp4File::read_from(&mut file, parse_options)
        .map_err(|e| CinetagError::InvalidContainer(format!("{}: {}", path.display(), e)))
}

fn save_ilst(path: &Path, ilst: &Ilst) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| CinetagError::Save(format!("cannot open {} for writing: {}", path.display(), e)))?;

    ilst.save_to(&mut file, WriteOptions::default())
        .map_err(|e| CinetagError::Save(e.to_string()))?;

    file.sync_all()
        .map_err(|e| CinetagError::Save(e.to_string()))
}
