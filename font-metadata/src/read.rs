//! Errors produced while reading font data.

use std::fmt;

use types::Tag;

/// An error that occurs when reading binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    InvalidArrayLen,
    MalformedData(&'static str),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}

/// The reasons a font file can fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The leading signature matches no supported container.
    #[error("unrecognized font format")]
    UnrecognizedFormat,
    /// A header, directory or table extends past the end of the input.
    #[error("font data is truncated")]
    TruncatedContainer,
    /// A WOFF2 table uses a transform that is not reversed.
    #[error("unsupported compression or transform for '{0}' table")]
    UnsupportedCompression(Tag),
    /// A zlib or Brotli stream could not be decompressed.
    #[error("corrupt compressed data: {0}")]
    CorruptCompressedData(String),
    /// The directory is in bounds but internally inconsistent.
    #[error("invalid font container: {0}")]
    InvalidContainer(&'static str),
}

impl From<ReadError> for DecodeError {
    fn from(src: ReadError) -> Self {
        match src {
            ReadError::OutOfBounds | ReadError::InvalidArrayLen => DecodeError::TruncatedContainer,
            ReadError::MalformedData(msg) => DecodeError::InvalidContainer(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_errors_map_to_decode_errors() {
        assert_eq!(
            DecodeError::from(ReadError::OutOfBounds),
            DecodeError::TruncatedContainer
        );
        assert_eq!(
            DecodeError::from(ReadError::MalformedData("bad")),
            DecodeError::InvalidContainer("bad")
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            DecodeError::UnsupportedCompression(Tag::new(b"cmap")).to_string(),
            "unsupported compression or transform for 'cmap' table"
        );
        assert_eq!(
            DecodeError::TruncatedContainer.to_string(),
            "font data is truncated"
        );
    }
}
