//! Decompression of the table data stored in web font containers.
//!
//! [WOFF 1.0](https://www.w3.org/TR/WOFF/) compresses each table separately
//! with zlib, and [WOFF 2.0](https://www.w3.org/TR/WOFF2/) compresses all
//! tables together into a single brotli stream. Both formats declare the size
//! of the decompressed data up front, so every function here takes a maximum
//! output length and fails rather than allocating beyond it.

mod bounded;
mod decode_error;
mod rust_brotli;
mod zlib;

pub use decode_error::DecodeError;

/// Decodes a brotli stream, as found in the body of a WOFF2 file.
///
/// Fails if the output would be longer than `max_len`, or if input is left
/// unread once the stream ends.
pub fn brotli_decode(encoded: &[u8], max_len: usize) -> Result<Vec<u8>, DecodeError> {
    rust_brotli::brotli_decode(encoded, max_len)
}

/// Decodes a zlib stream, as found in a compressed WOFF 1.0 table.
///
/// Fails if the output would be longer than `max_len`.
pub fn zlib_decode(encoded: &[u8], max_len: usize) -> Result<Vec<u8>, DecodeError> {
    zlib::zlib_decode(encoded, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TARGET: &[u8] = "hijkabcdeflmnohijkabcdeflmno\n".as_bytes();

    fn brotli_encode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 5, 22);
            writer.write_all(data).unwrap();
        }
        out
    }

    fn zlib_encode(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn brotli_round_trip() {
        let encoded = brotli_encode(TARGET);
        assert_eq!(Ok(TARGET.to_vec()), brotli_decode(&encoded, TARGET.len()));
    }

    #[test]
    fn brotli_decode_excess_output() {
        let encoded = brotli_encode(TARGET);
        assert_eq!(Ok(TARGET.to_vec()), brotli_decode(&encoded, TARGET.len() + 1));
    }

    #[test]
    fn brotli_decode_too_little_output() {
        let encoded = brotli_encode(TARGET);
        assert!(brotli_decode(&encoded, TARGET.len() - 1).is_err());
    }

    #[test]
    fn brotli_decode_input_missing() {
        let encoded = brotli_encode(TARGET);
        assert!(brotli_decode(&encoded[..encoded.len() - 1], TARGET.len()).is_err());
    }

    #[test]
    fn brotli_decode_trailing_data() {
        let mut encoded = brotli_encode(TARGET);
        encoded.extend([0; 8192]);
        assert_eq!(
            Err(DecodeError::ExcessInputData),
            brotli_decode(&encoded, TARGET.len())
        );
    }

    #[test]
    fn brotli_decode_invalid() {
        let patch = [0xFF, 0xFF, 0xFFu8];
        assert!(brotli_decode(&patch, 10).is_err());
    }

    #[test]
    fn zlib_round_trip() {
        let encoded = zlib_encode(TARGET);
        assert_eq!(Ok(TARGET.to_vec()), zlib_decode(&encoded, TARGET.len()));
    }

    #[test]
    fn zlib_decode_too_little_output() {
        let encoded = zlib_encode(TARGET);
        assert_eq!(
            Err(DecodeError::MaxSizeExceeded),
            zlib_decode(&encoded, TARGET.len() - 1)
        );
    }

    #[test]
    fn zlib_decode_invalid() {
        assert_eq!(
            Err(DecodeError::InvalidStream),
            zlib_decode(&[0xFF, 0xFF, 0xFF, 0xFF], 10)
        );
    }
}
