#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use cinetag::error::Result;
use cinetag::mkv::AttachmentEditor;
use cinetag::CoverImage;
use image::{DynamicImage, Rgb, RgbImage};

pub fn sample_cover() -> CoverImage {
    let image = RgbImage::from_fn(40, 60, |x, y| Rgb([(x * 6) as u8, (y * 4) as u8, 128]));
    CoverImage::new(DynamicImage::ImageRgb8(image))
}

fn atom(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// Smallest file the MP4 reader accepts: `ftyp`, a `moov` holding only
/// `mvhd`, and a short `mdat`
pub fn minimal_mp4() -> Vec<u8> {
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"isom");
    ftyp.extend_from_slice(&512u32.to_be_bytes());
    ftyp.extend_from_slice(b"isomiso2mp41");

    let mut mvhd = Vec::new();
    mvhd.extend_from_slice(&[0; 4]); // version + flags
    mvhd.extend_from_slice(&[0; 8]); // creation + modification time
    mvhd.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // duration
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
    mvhd.extend_from_slice(&[0; 10]); // reserved
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes()); // unity matrix
    }
    mvhd.extend_from_slice(&[0; 24]); // pre_defined
    mvhd.extend_from_slice(&2u32.to_be_bytes()); // next_track_ID

    let mut file = atom(b"ftyp", &ftyp);
    file.extend(atom(b"moov", &atom(b"mvhd", &mvhd)));
    file.extend(atom(b"mdat", &[0xAB; 32]));
    file
}

/// One recorded attachment editor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCall {
    Delete { media: String, mime_type: String },
    Add { media: String, attachment: String, name: String, mime_type: String },
}

/// Attachment editor double that records calls and fails on request
#[derive(Clone, Default)]
pub struct RecordingEditor {
    pub calls: Arc<Mutex<Vec<EditorCall>>>,
    pub missing: bool,
    pub fail_delete: bool,
    pub fail_add: bool,
}

impl RecordingEditor {
    pub fn calls(&self) -> Vec<EditorCall> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(step: &str) -> cinetag::error::CinetagError {
        cinetag::error::CinetagError::ExternalTool {
            step: step.to_string(),
            reason: "exit status 2".to_string(),
        }
    }
}

impl AttachmentEditor for RecordingEditor {
    fn check_availability(&self) -> Result<()> {
        if self.missing {
            return Err(cinetag::error::CinetagError::ToolNotFound("mkvpropedit".to_string()));
        }
        Ok(())
    }

    fn version(&self) -> Result<String> {
        Ok("mkvpropedit v0.0.0 (test double)".to_string())
    }

    fn delete_attachments_by_mime(&self, media_path: &Path, mime_type: &str) -> Result<()> {
        self.calls.lock().unwrap().push(EditorCall::Delete {
            media: media_path.display().to_string(),
            mime_type: mime_type.to_string(),
        });
        if self.fail_delete {
            return Err(Self::failure("Deleting attachments"));
        }
        Ok(())
    }

    fn add_attachment(&self, media_path: &Path, attachment_path: &Path, name: &str, mime_type: &str) -> Result<()> {
        assert!(attachment_path.exists(), "attachment must exist while the editor runs");
        self.calls.lock().unwrap().push(EditorCall::Add {
            media: media_path.display().to_string(),
            attachment: attachment_path.display().to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        });
        if self.fail_add {
            return Err(Self::failure("Adding attachment"));
        }
        Ok(())
    }
}
