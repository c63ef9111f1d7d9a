//! Error types for the drawing engine library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Image encoding or decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark data malformed (wrong count, non-finite coordinates)
    #[error("Landmark error: {0}")]
    Landmark(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Landmark trace file could not be read or parsed
    #[error("Trace error: {0}")]
    Trace(String),

    /// Drawing analysis request failed
    #[error("Analysis error: {0}")]
    Analysis(#[from] crate::analysis::AnalysisError),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
