use std::path::Path;

use crate::artwork::CoverImage;
use crate::error::Result;
use crate::events::EventEmitter;

/// Writes a cover image into one container format
pub trait FormatHandler: Send + Sync {
    /// Embed `cover` into the file at `path`, returning the success message.
    ///
    /// May report progress through `events`; the terminal event is left to
    /// the caller.
    fn write(&self, path: &Path, cover: &CoverImage, events: &mut EventEmitter<'_>) -> Result<String>;
}
