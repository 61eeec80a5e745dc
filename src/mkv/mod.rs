// Matroska cover attachments
//
// MKV covers are edited through an external attachment editor instead of a
// tag library:
// - Commands: command line building and process execution
// - Propedit: mkvpropedit-backed editor

pub mod commands;
pub mod propedit;

use std::path::Path;
use tracing::{info, debug};

pub use commands::*;
pub use propedit::*;

use crate::artwork::{CoverImage, ImageEncoder};
use crate::config::MkvConfig;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::handler::FormatHandler;

/// Capability to edit attachments of a Matroska file in place
#[cfg_attr(test, mockall::automock)]
pub trait AttachmentEditor: Send + Sync {
    /// Fail with `ToolNotFound` when the editor cannot be run
    fn check_availability(&self) -> Result<()>;

    /// Editor version line
    fn version(&self) -> Result<String>;

    /// Remove every attachment whose MIME type is `mime_type`
    fn delete_attachments_by_mime(&self, media_path: &Path, mime_type: &str) -> Result<()>;

    /// Attach the file at `attachment_path` under `name` with `mime_type`
    fn add_attachment(&self, media_path: &Path, attachment_path: &Path, name: &str, mime_type: &str) -> Result<()>;
}

/// Factory for creating attachment editor instances
pub struct AttachmentEditorFactory;

impl AttachmentEditorFactory {
    /// Create the default editor implementation (mkvpropedit-based)
    pub fn create_editor(config: MkvConfig) -> Box<dyn AttachmentEditor> {
        Box::new(MkvPropEdit::new(config))
    }
}

/// Replaces the JPEG cover attachment of MKV files
pub struct MkvHandler {
    editor: Box<dyn AttachmentEditor>,
    encoder: ImageEncoder,
    attachment_name: String,
    mime_type: String,
}

impl MkvHandler {
    pub fn new(editor: Box<dyn AttachmentEditor>, encoder: ImageEncoder, config: &MkvConfig) -> Self {
        Self {
            editor,
            encoder,
            attachment_name: config.attachment_name.clone(),
            mime_type: config.attachment_mime_type.clone(),
        }
    }
}

impl FormatHandler for MkvHandler {
    fn write(&self, path: &Path, cover: &CoverImage, events: &mut EventEmitter<'_>) -> Result<String> {
        self.editor.check_availability()?;

        // Removed when `temp` drops, on every return path below
        let temp = self.encoder.encode_to_temporary_file(cover)?;
        debug!("Cover staged at {}", temp.path().display());

        events.progress("Saving MKV tags...");

        // If the add step fails after this, the file is left without a cover
        self.editor.delete_attachments_by_mime(path, &self.mime_type)?;
        self.editor.add_attachment(path, temp.path(), &self.attachment_name, &self.mime_type)?;

        info!("Cover attachment written to {}", path.display());
        Ok("MKV tags written successfully".to_string())
    }
}
