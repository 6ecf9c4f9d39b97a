use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a photo or object image could not be decoded.
///
/// No partially built image is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error while decoding: {0}")]
    Io(#[from] io::Error),

    #[error("cannot allocate {bytes} bytes for pixel data")]
    OutOfMemory { bytes: usize },

    #[error("image dimensions {width}x{height} exceed the {max_width}x{max_height} limit")]
    TooLarge {
        width: u16,
        height: u16,
        max_width: u16,
        max_height: u16,
    },

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("truncated data: expected {expected} bytes, got {read}")]
    Truncated { expected: usize, read: usize },
}
