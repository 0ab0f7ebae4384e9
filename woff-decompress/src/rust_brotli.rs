use std::io::Cursor;

use brotli_decompressor::BrotliDecompress;

use crate::bounded::BoundedOutput;
use crate::decode_error::DecodeError;

/// Decode the single brotli stream holding every table of a WOFF2 file.
pub(crate) fn brotli_decode(encoded: &[u8], max_len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut input = Cursor::new(encoded);
    let mut output = BoundedOutput::new(max_len);
    BrotliDecompress(&mut input, &mut output)?;

    if (input.position() as usize) < encoded.len() {
        return Err(DecodeError::ExcessInputData);
    }
    Ok(output.into_inner())
}
