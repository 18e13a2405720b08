//! Error types for schematic scene compilation.

use thiserror::Error;

/// Result type alias using SceneError.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Main error type for schematic decoding and block compilation.
///
/// Decode-time errors (`Format`, `Schema`) are fatal to a load. Per-block
/// errors (`Lookup`, `NotFound`, `MissingGeometry`) are caught by the scene
/// assembly loop, which skips the offending block and continues.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Malformed schematic data: short bit-packed streams, inconsistent
    /// declared sizes, broken NBT structure, circular model inheritance.
    #[error("format error: {0}")]
    Format(String),

    /// A resource-pack document failed structural validation.
    #[error("schema validation failed for {name}: {reason}")]
    Schema { name: String, reason: String },

    /// No archive entry matched the computed resource path, or a texture
    /// reference chain ended on an undefined key.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// No variant key or multipart condition matched a block's properties.
    #[error("no matching variant: {0}")]
    Lookup(String),

    /// A leaf model declares no elements and cannot be meshed.
    #[error("no geometry for model {0}")]
    MissingGeometry(String),

    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to read NBT data.
    #[error("NBT error: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),

    /// Failed to decode an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
