mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use cinetag::artwork::ImageEncoder;
use cinetag::config::Config;
use cinetag::error::CinetagError;
use cinetag::{mp4, CoverImage, TagEvent, TagWriter};
use image::DynamicImage;
use lofty::picture::MimeType;

use common::{minimal_mp4, sample_cover, RecordingEditor};

fn writer() -> TagWriter {
    TagWriter::with_attachment_editor(&Config::default(), Box::new(RecordingEditor::default()))
}

#[test]
fn test_round_trip_single_cover() {
    let temp = TempDir::new().unwrap();
    let movie = temp.child("movie.mp4");
    movie.write_binary(&minimal_mp4()).unwrap();

    let cover = sample_cover();
    let mut events = Vec::new();
    let message = writer()
        .write_tags_to_file(movie.path(), &cover, |event| events.push(event))
        .unwrap();

    assert_eq!(message, "MP4 tags written successfully");
    assert_eq!(
        events,
        vec![
            TagEvent::Progress("Starting to write tags...".to_string()),
            TagEvent::Progress("Saving MP4 tags...".to_string()),
            TagEvent::Success("MP4 tags written successfully".to_string()),
        ]
    );

    let expected = ImageEncoder::new(Config::default().image.jpeg_quality).encode(&cover).unwrap();
    let pictures = mp4::read_cover_art(movie.path()).unwrap();
    assert_eq!(pictures.len(), 1);
    assert_eq!(pictures[0].mime_type(), Some(&MimeType::Jpeg));
    assert_eq!(pictures[0].data(), expected.as_slice());
}

#[test]
fn test_second_write_replaces_cover() {
    let temp = TempDir::new().unwrap();
    let movie = temp.child("Movie.MP4");
    movie.write_binary(&minimal_mp4()).unwrap();

    let writer = writer();
    writer.write_tags_to_file(movie.path(), &sample_cover(), |_| {}).unwrap();
    writer.write_tags_to_file(movie.path(), &sample_cover(), |_| {}).unwrap();

    assert_eq!(mp4::read_cover_art(movie.path()).unwrap().len(), 1);
}

#[test]
fn test_stream_data_untouched() {
    let temp = TempDir::new().unwrap();
    let movie = temp.child("movie.mp4");
    movie.write_binary(&minimal_mp4()).unwrap();

    writer().write_tags_to_file(movie.path(), &sample_cover(), |_| {}).unwrap();

    let written = std::fs::read(movie.path()).unwrap();
    let payload = [0xABu8; 32];
    assert!(written.windows(payload.len()).any(|window| window == payload));
    assert!(written.len() > minimal_mp4().len());
}

#[test]
fn test_corrupt_file_left_identical() {
    let temp = TempDir::new().unwrap();
    let movie = temp.child("movie.mp4");
    let garbage: Vec<u8> = (0..2048u32).map(|i| (i * 31 % 251) as u8).collect();
    movie.write_binary(&garbage).unwrap();

    let mut events = Vec::new();
    let result = writer().write_tags_to_file(movie.path(), &sample_cover(), |event| events.push(event));

    assert!(matches!(result, Err(CinetagError::InvalidContainer(_))));
    assert_eq!(std::fs::read(movie.path()).unwrap(), garbage);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[1], TagEvent::Error(message) if message.starts_with("Invalid MP4 file")));
}

#[test]
fn test_encode_failure_leaves_file_identical() {
    let temp = TempDir::new().unwrap();
    let movie = temp.child("movie.mp4");
    movie.write_binary(&minimal_mp4()).unwrap();

    let empty = CoverImage::new(DynamicImage::new_rgb8(0, 16));
    let mut events = Vec::new();
    let result = writer().write_tags_to_file(movie.path(), &empty, |event| events.push(event));

    assert!(matches!(result, Err(CinetagError::Encode(_))));
    assert_eq!(std::fs::read(movie.path()).unwrap(), minimal_mp4());
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], TagEvent::Progress("Starting to write tags...".to_string()));
    assert!(matches!(&events[1], TagEvent::Error(message) if message.starts_with("Image encoding error")));
    assert!(mp4::read_cover_art(movie.path()).unwrap().is_empty());
}
