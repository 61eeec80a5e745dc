use thiserror::Error;

#[derive(Error, Debug)]
pub enum CinetagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format")]
    UnsupportedFormat { extension: String },

    #[error("Invalid MP4 file: {0}")]
    InvalidContainer(String),

    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("Failed to write MP4 tags: {0}")]
    Save(String),

    #[error("{0} program not found. Please install it.")]
    ToolNotFound(String),

    #[error("{step} failed: {reason}")]
    ExternalTool { step: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, CinetagError>;
