use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Shrink result has no usable output URL")]
    MissingOutputUrl,

    #[error("Output path already claimed by another input: {0}")]
    DuplicateOutput(PathBuf),

    #[error("Invalid credential header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    /// A file rejected by the service during a batch run.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
