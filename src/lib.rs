//! Cinetag - Movie Poster Embedding
//!
//! Embeds cover art into MP4 files through their `ilst` tags and into MKV
//! files as an attachment via mkvpropedit, without touching the
//! audio/video streams.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod artwork;
pub mod events;
pub mod handler;
pub mod mp4;
pub mod mkv;
pub mod writer;
pub mod batch;

pub use artwork::CoverImage;
pub use events::TagEvent;
pub use format::MediaFormat;
pub use writer::TagWriter;
