use std::path::Path;
use tracing::{info, warn};

use crate::artwork::{CoverImage, ImageEncoder};
use crate::config::Config;
use crate::error::{Result, CinetagError};
use crate::events::{EventEmitter, TagEvent};
use crate::format::MediaFormat;
use crate::handler::FormatHandler;
use crate::mkv::{AttachmentEditor, AttachmentEditorFactory, MkvHandler};
use crate::mp4::Mp4Handler;

/// Embeds cover art into MP4 and MKV files.
///
/// Holds no per-call state: one writer can serve any number of files, from
/// any number of threads, as long as no two calls target the same path.
pub struct TagWriter {
    mp4: Mp4Handler,
    mkv: MkvHandler,
}

impl TagWriter {
    pub fn new(config: &Config) -> Self {
        let editor = AttachmentEditorFactory::create_editor(config.mkv.clone());
        Self::with_attachment_editor(config, editor)
    }

    /// Build a writer around a specific attachment editor
    pub fn with_attachment_editor(config: &Config, editor: Box<dyn AttachmentEditor>) -> Self {
        let encoder = ImageEncoder::from_config(&config.image);

        Self {
            mp4: Mp4Handler::new(encoder.clone()),
            mkv: MkvHandler::new(editor, encoder, &config.mkv),
        }
    }

    /// Write `cover` into the file at `path`.
    ///
    /// `on_event` receives zero or more progress events followed by exactly
    /// one success or error event; the returned result matches that terminal
    /// event.
    pub fn write_tags_to_file<P, F>(&self, path: P, cover: &CoverImage, mut on_event: F) -> Result<String>
    where
        P: AsRef<Path>,
        F: FnMut(TagEvent),
    {
        let path = path.as_ref();
        let mut events = EventEmitter::new(&mut on_event);

        events.progress("Starting to write tags...");
        let outcome = self.dispatch(path, cover, &mut events);

        match &outcome {
            Ok(message) => info!("{}: {}", path.display(), message),
            Err(e) => warn!("{}: {}", path.display(), e),
        }
        events.finish(&outcome);

        outcome
    }

    fn dispatch(&self, path: &Path, cover: &CoverImage, events: &mut EventEmitter<'_>) -> Result<String> {
        let format = MediaFormat::from_path(path);
        info!("Writing cover to {} ({})", path.display(), format);

        let handler: &dyn FormatHandler = match format {
            MediaFormat::Mp4 => &self.mp4,
            MediaFormat::Mkv => &self.mkv,
            MediaFormat::Unsupported => {
                let extension = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string())
                    .unwrap_or_default();
                return Err(CinetagError::UnsupportedFormat { extension });
            }
        };

        if !path.is_file() {
            return Err(CinetagError::FileNotFound(path.display().to_string()));
        }

        handler.write(path, cover, events)
    }
}
