//! Error types for outline-to-deck rendering.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or rendering a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// The batch topic was empty or whitespace-only.
    #[error("Presentation topic is empty")]
    EmptyTopic,

    /// The outline generation collaborator failed.
    #[error("Outline generation failed: {0}")]
    GenerationFailed(String),

    /// The outline does not match the expected shape.
    #[error("Invalid outline: {0}")]
    InvalidOutline(String),

    /// A background image could not be decoded for embedding.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// ZIP container error while packaging or reading a deck.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML error while writing or reading a deck part.
    #[error("XML error: {0}")]
    Xml(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the outline collaborator.
    ///
    /// Anything else surfacing from a collaborator is wrapped as
    /// [`Error::GenerationFailed`] by the batch driver.
    pub fn is_generation_error(&self) -> bool {
        matches!(self, Self::GenerationFailed(_) | Self::InvalidOutline(_))
    }
}
