use std::io::{self, ErrorKind};

/// Errors from decoding a WOFF or WOFF2 compressed stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("compressed table data is not a valid stream")]
    InvalidStream,
    #[error("decompressed table data is larger than the size declared by the container")]
    MaxSizeExceeded,
    #[error("compressed table data continues past the end of the stream")]
    ExcessInputData,
    #[error("i/o error while decompressing table data: {0}")]
    Io(ErrorKind),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            // raised by BoundedOutput
            ErrorKind::OutOfMemory => DecodeError::MaxSizeExceeded,
            ErrorKind::UnexpectedEof | ErrorKind::InvalidData | ErrorKind::InvalidInput => {
                DecodeError::InvalidStream
            }
            kind => DecodeError::Io(kind),
        }
    }
}
