//! Error handling and custom error types
//!
//! Provides unified error handling across the pipeline using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown size profile: {0}")]
    UnknownProfile(String),

    #[error("Image decode error: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image encode error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Presigning error: {0}")]
    Presign(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
