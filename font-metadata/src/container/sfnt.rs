//! Bare SFNT fonts and TrueType collections.
//!
//! <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>

use std::collections::BTreeMap;

use bytemuck::AnyBitPattern;
use types::Tag;

use super::{insert_table, FontContainer, FontFormat, TableEntry};
use crate::{font_data::FontData, read::DecodeError};

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Record for a table in a font.
#[derive(Clone, Copy, Debug, AnyBitPattern)]
#[repr(C)]
struct TableRecord {
    tag: [u8; 4],
    checksum: [u8; 4],
    offset: [u8; 4],
    length: [u8; 4],
}

impl TableRecord {
    fn tag(&self) -> Tag {
        Tag::from_be_bytes(self.tag)
    }

    fn checksum(&self) -> u32 {
        u32::from_be_bytes(self.checksum)
    }

    fn offset(&self) -> usize {
        u32::from_be_bytes(self.offset) as usize
    }

    fn length(&self) -> usize {
        u32::from_be_bytes(self.length) as usize
    }
}

pub(super) fn read(data: FontData, format: FontFormat) -> Result<FontContainer, DecodeError> {
    let tables = read_table_directory(data, 0)?;
    Ok(FontContainer::new(format, Some(format), tables))
}

/// Read the first font of a collection.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#font-collections>
pub(super) fn read_collection(data: FontData) -> Result<FontContainer, DecodeError> {
    let num_fonts: u32 = data.read_at(8)?;
    if num_fonts == 0 {
        log::debug!("font collection contains no fonts");
        return Err(DecodeError::TruncatedContainer);
    }
    if num_fonts > 1 {
        log::debug!("font collection contains {num_fonts} fonts, reading the first");
    }
    let first_offset = data.read_at::<u32>(12)? as usize;
    let sfnt_version: u32 = data.read_at(first_offset)?;
    let flavor = FontFormat::from_sfnt_version(sfnt_version).ok_or_else(|| {
        log::debug!("first collection member has unknown version {sfnt_version:#010X}");
        DecodeError::UnrecognizedFormat
    })?;
    let tables = read_table_directory(data, first_offset)?;
    Ok(FontContainer::new(FontFormat::Collection, Some(flavor), tables))
}

/// Read the table directory starting at `offset`.
///
/// Table offsets are always relative to the start of the file.
fn read_table_directory(
    data: FontData,
    offset: usize,
) -> Result<BTreeMap<Tag, TableEntry>, DecodeError> {
    let num_tables = data.read_at::<u16>(offset + 4)? as usize;
    let records_start = offset + SFNT_HEADER_LEN;
    let records: &[TableRecord] =
        data.read_array(records_start..records_start + num_tables * TABLE_RECORD_LEN)?;
    let mut tables = BTreeMap::new();
    for record in records {
        let table = data
            .slice_len(record.offset(), record.length())
            .ok_or_else(|| {
                log::debug!("'{}' table extends past the end of the file", record.tag());
                DecodeError::TruncatedContainer
            })?;
        insert_table(
            &mut tables,
            record.tag(),
            TableEntry::borrowed(table.as_bytes(), record.checksum()),
        );
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use font_test_data::{basic_font, be_buffer, build_ttc, tables, FontBuilder};
    use types::{CFF_SFNT_VERSION, TTC_HEADER_TAG};

    use super::*;

    #[test]
    fn basic_truetype() {
        let bytes = basic_font().build();
        let font = FontContainer::read(&bytes).unwrap();
        assert_eq!(font.format(), FontFormat::TrueType);
        assert_eq!(font.flavor(), Some(FontFormat::TrueType));
        let tags: Vec<_> = font.tags().map(|tag| tag.to_string()).collect();
        assert_eq!(tags, ["OS/2", "head", "maxp", "name"]);
        assert_eq!(
            font.table_data(Tag::new(b"maxp")),
            Some(tables::maxp_v1(font_test_data::BASIC_NUM_GLYPHS).as_slice())
        );
        assert!(font.validate_checksums().is_empty());
    }

    #[test]
    fn cff_flavor() {
        let mut builder = basic_font();
        builder.sfnt_version(CFF_SFNT_VERSION);
        let bytes = builder.build();
        let font = FontContainer::read(&bytes).unwrap();
        assert_eq!(font.format(), FontFormat::OpenTypeCff);
    }

    #[test]
    fn empty_directory() {
        let bytes = FontBuilder::new().build();
        let font = FontContainer::read(&bytes).unwrap();
        assert!(font.is_empty());
    }

    #[test]
    fn truncated_directory() {
        let bytes = basic_font().build();
        // header plus one and a half records
        let truncated = &bytes[..SFNT_HEADER_LEN + 24];
        assert_eq!(
            FontContainer::read(truncated).err(),
            Some(DecodeError::TruncatedContainer)
        );
    }

    #[test]
    fn table_past_end_of_file() {
        let bytes = basic_font().build();
        // the last table is padded by at most three bytes
        let truncated = &bytes[..bytes.len() - 8];
        assert_eq!(
            FontContainer::read(truncated).err(),
            Some(DecodeError::TruncatedContainer)
        );
    }

    #[test]
    fn checksum_mismatch_is_reported() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut bytes = basic_font().build();
        // records are sorted by tag; 'maxp' is the third
        let record = SFNT_HEADER_LEN + 2 * TABLE_RECORD_LEN;
        let offset = u32::from_be_bytes(bytes[record + 8..record + 12].try_into().unwrap());
        bytes[offset as usize + 5] ^= 0xFF;
        let font = FontContainer::read(&bytes).unwrap();
        let mismatches = font.validate_checksums();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].tag, Tag::new(b"maxp"));
        assert_ne!(mismatches[0].expected, mismatches[0].actual);
    }

    #[test]
    fn collection_reads_first_font() {
        let first = basic_font();
        let mut second = FontBuilder::new();
        second.add_raw(Tag::new(b"maxp"), tables::maxp(7));
        let bytes = build_ttc(&[&first, &second]);
        let font = FontContainer::read(&bytes).unwrap();
        assert_eq!(font.format(), FontFormat::Collection);
        assert_eq!(font.flavor(), Some(FontFormat::TrueType));
        assert_eq!(font.len(), 4);
        assert_eq!(
            font.table_data(Tag::new(b"maxp")),
            Some(tables::maxp_v1(font_test_data::BASIC_NUM_GLYPHS).as_slice())
        );
    }

    #[test]
    fn collection_without_fonts() {
        let bytes = be_buffer! { TTC_HEADER_TAG, 0x00010000u32, 0u32 };
        assert_eq!(
            FontContainer::read(&bytes).err(),
            Some(DecodeError::TruncatedContainer)
        );
    }

    #[test]
    fn collection_member_with_bad_version() {
        let bytes = be_buffer! {
            TTC_HEADER_TAG, 0x00010000u32, 1u32, 16u32,
            0xDEADBEEFu32, 0u16, 0u16, 0u16, 0u16
        };
        assert_eq!(
            FontContainer::read(&bytes).err(),
            Some(DecodeError::UnrecognizedFormat)
        );
    }
}
