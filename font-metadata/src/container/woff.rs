//! WOFF 1.0
//!
//! <https://www.w3.org/TR/WOFF/>

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use bytemuck::AnyBitPattern;
use types::Tag;

use super::{insert_table, FontContainer, FontFormat, TableEntry};
use crate::{font_data::FontData, read::DecodeError};

const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;

#[derive(Clone, Copy, Debug, AnyBitPattern)]
#[repr(C)]
struct WoffTableEntry {
    tag: [u8; 4],
    offset: [u8; 4],
    comp_length: [u8; 4],
    orig_length: [u8; 4],
    orig_checksum: [u8; 4],
}

impl WoffTableEntry {
    fn tag(&self) -> Tag {
        Tag::from_be_bytes(self.tag)
    }

    fn offset(&self) -> usize {
        u32::from_be_bytes(self.offset) as usize
    }

    fn comp_length(&self) -> usize {
        u32::from_be_bytes(self.comp_length) as usize
    }

    fn orig_length(&self) -> usize {
        u32::from_be_bytes(self.orig_length) as usize
    }

    fn orig_checksum(&self) -> u32 {
        u32::from_be_bytes(self.orig_checksum)
    }
}

pub(super) fn read(data: FontData) -> Result<FontContainer, DecodeError> {
    if data.len() < WOFF_HEADER_LEN {
        return Err(DecodeError::TruncatedContainer);
    }
    let flavor: u32 = data.read_at(4)?;
    let num_tables = data.read_at::<u16>(12)? as usize;
    let entries: &[WoffTableEntry] =
        data.read_array(WOFF_HEADER_LEN..WOFF_HEADER_LEN + num_tables * WOFF_ENTRY_LEN)?;

    let mut tables = BTreeMap::new();
    for entry in entries {
        let tag = entry.tag();
        let ordering = entry.comp_length().cmp(&entry.orig_length());
        if ordering == Ordering::Greater {
            log::debug!(
                "'{tag}' table: compressed length {} exceeds original length {}",
                entry.comp_length(),
                entry.orig_length()
            );
            return Err(DecodeError::InvalidContainer(
                "WOFF table is larger compressed than uncompressed",
            ));
        }
        let stored = data
            .slice_len(entry.offset(), entry.comp_length())
            .ok_or(DecodeError::TruncatedContainer)?
            .as_bytes();
        let table = match ordering {
            Ordering::Less => Cow::Owned(inflate(tag, stored, entry.orig_length())?),
            _ => Cow::Borrowed(stored),
        };
        insert_table(
            &mut tables,
            tag,
            TableEntry::new(table, Some(entry.orig_checksum())),
        );
    }
    Ok(FontContainer::new(
        FontFormat::Woff,
        FontFormat::from_sfnt_version(flavor),
        tables,
    ))
}

fn inflate(tag: Tag, stored: &[u8], orig_length: usize) -> Result<Vec<u8>, DecodeError> {
    let table = woff_decompress::zlib_decode(stored, orig_length)
        .map_err(|e| DecodeError::CorruptCompressedData(format!("'{tag}' table: {e}")))?;
    if table.len() != orig_length {
        return Err(DecodeError::CorruptCompressedData(format!(
            "'{tag}' table: expected {orig_length} bytes, decompressed {}",
            table.len()
        )));
    }
    Ok(table)
}
