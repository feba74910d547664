//! Error types for the asciify core

use thiserror::Error;

/// Result type for asciify core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
///
/// Per-character glyph gaps in banner fonts are deliberately absent from
/// this taxonomy: a missing glyph degrades silently and contributes
/// nothing to the output.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid rendering configuration (empty ramp, non-positive scale
    /// or resolution factor)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rendering surface lacks pixel read-back capability
    #[error("Unsupported surface: {0}")]
    UnsupportedSurface(String),

    /// A non-image element has no font mapping for its tag
    #[error("No font mapped for element <{0}>")]
    UnmappedElement(String),

    /// Font resource fetch or parse failed
    #[error("Failed to load font '{name}': {reason}")]
    FontLoad { name: String, reason: String },

    /// Font resource fetch exceeded its deadline
    #[error("Timed out loading font '{name}'")]
    FontTimeout { name: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
