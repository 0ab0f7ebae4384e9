//! Reading descriptive metadata from font files
//!
//! This crate extracts the human-readable facts about a font (family and
//! style names, designer, licence, vendor, embedding permissions, glyph
//! count) from the bytes of a font file.
//!
//! Four containers are understood: bare SFNT files (TrueType or
//! CFF-flavored OpenType), TrueType collections (`.ttc`, first font only),
//! [WOFF 1.0] and [WOFF 2.0]. Reading happens in two steps:
//!
//! - a [`FontContainer`] is read from the raw bytes, producing a map from
//!   table tag to decompressed table data;
//! - the `name`, `OS/2` and `maxp` tables are decoded and projected into a
//!   flat [`FontMetadata`] record.
//!
//! Only a container that cannot be read is an error. A missing or
//! malformed table simply leaves the corresponding fields empty.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let metadata = font_metadata::parse_font(&font_bytes, "ttf").expect("failed to read font data");
//! println!(
//!     "{} ({} glyphs)",
//!     metadata.family.as_deref().unwrap_or("<unnamed>"),
//!     metadata.num_glyphs.unwrap_or_default()
//! );
//! ```
//!
//! [WOFF 1.0]: https://www.w3.org/TR/WOFF/
//! [WOFF 2.0]: https://www.w3.org/TR/WOFF2/

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod container;
mod extension;
mod font_data;
mod metadata;
mod read;
pub mod tables;

pub use container::{ChecksumMismatch, FontContainer, FontFormat};
pub use extension::{FontExtension, UnsupportedExtension};
pub use font_data::FontData;
pub use metadata::{project, FontMetadata};
pub use read::{DecodeError, ReadError};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

/// Read a font file and project its metadata.
///
/// `declared_extension` is the extension the file was submitted with. It is
/// only compared against the detected container, and a mismatch is logged
/// rather than rejected.
pub fn parse_font(bytes: &[u8], declared_extension: &str) -> Result<FontMetadata, DecodeError> {
    let font = FontContainer::read(bytes)?;
    match declared_extension.parse::<FontExtension>() {
        Ok(ext) if !ext.expects(font.format()) => log::debug!(
            "declared extension {ext} does not match detected format {}",
            font.format()
        ),
        Ok(_) => (),
        Err(_) => log::debug!("unrecognized declared extension '{declared_extension}'"),
    }
    Ok(project(&font))
}

#[cfg(test)]
mod tests {
    use font_test_data::basic_font;

    use super::*;

    #[test]
    fn extension_is_advisory() {
        let bytes = basic_font().build_woff();
        let metadata = parse_font(&bytes, ".ttf").unwrap();
        assert_eq!(metadata.file_format.as_deref(), Some("WOFF"));
        let metadata = parse_font(&bytes, "pdf").unwrap();
        assert_eq!(metadata.file_format.as_deref(), Some("WOFF"));
    }

    #[test]
    fn errors_propagate() {
        assert_eq!(
            parse_font(b"%PDF-1.7", "ttf"),
            Err(DecodeError::UnrecognizedFormat)
        );
        assert_eq!(parse_font(&[], "ttf"), Err(DecodeError::UnrecognizedFormat));
    }
}
