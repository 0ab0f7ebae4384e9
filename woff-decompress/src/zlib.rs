use std::io;

use flate2::read::ZlibDecoder;

use crate::bounded::BoundedOutput;
use crate::decode_error::DecodeError;

/// Inflate one compressed WOFF table.
pub(crate) fn zlib_decode(encoded: &[u8], max_len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = ZlibDecoder::new(encoded);
    let mut output = BoundedOutput::new(max_len);
    io::copy(&mut decoder, &mut output)?;
    Ok(output.into_inner())
}
