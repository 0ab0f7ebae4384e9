//! WOFF 2.0
//!
//! All table data is held in a single brotli stream following the table
//! directory. Some tables may additionally be transformed; of those, only
//! the `glyf`, `loca` and `hmtx` transforms are expected, and since none of
//! those tables carry metadata they are skipped rather than reconstructed.
//!
//! <https://www.w3.org/TR/WOFF2/>

use std::borrow::Cow;
use std::collections::BTreeMap;

use types::{Tag, TTC_HEADER_TAG};

use super::{insert_table, FontContainer, FontFormat, TableEntry};
use crate::{
    font_data::{Cursor, FontData},
    read::{DecodeError, ReadError},
};

const WOFF2_HEADER_LEN: usize = 48;

/// The tag index value meaning an explicit tag follows the flags byte.
const EXPLICIT_TAG: u8 = 63;

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");

/// Transformed tables that are left out of the table map.
const OMITTED_TRANSFORMS: [Tag; 3] = [GLYF, LOCA, Tag::new(b"hmtx")];

/// <https://www.w3.org/TR/WOFF2/#table_dir_format>
const KNOWN_TABLE_TAGS: [Tag; 63] = [
    Tag::new(b"cmap"),
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
    Tag::new(b"maxp"),
    Tag::new(b"name"),
    Tag::new(b"OS/2"),
    Tag::new(b"post"),
    Tag::new(b"cvt "),
    Tag::new(b"fpgm"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"prep"),
    Tag::new(b"CFF "),
    Tag::new(b"VORG"),
    Tag::new(b"EBDT"),
    Tag::new(b"EBLC"),
    Tag::new(b"gasp"),
    Tag::new(b"hdmx"),
    Tag::new(b"kern"),
    Tag::new(b"LTSH"),
    Tag::new(b"PCLT"),
    Tag::new(b"VDMX"),
    Tag::new(b"vhea"),
    Tag::new(b"vmtx"),
    Tag::new(b"BASE"),
    Tag::new(b"GDEF"),
    Tag::new(b"GPOS"),
    Tag::new(b"GSUB"),
    Tag::new(b"EBSC"),
    Tag::new(b"JSTF"),
    Tag::new(b"MATH"),
    Tag::new(b"CBDT"),
    Tag::new(b"CBLC"),
    Tag::new(b"COLR"),
    Tag::new(b"CPAL"),
    Tag::new(b"SVG "),
    Tag::new(b"sbix"),
    Tag::new(b"acnt"),
    Tag::new(b"avar"),
    Tag::new(b"bdat"),
    Tag::new(b"bloc"),
    Tag::new(b"bsln"),
    Tag::new(b"cvar"),
    Tag::new(b"fdsc"),
    Tag::new(b"feat"),
    Tag::new(b"fmtx"),
    Tag::new(b"fvar"),
    Tag::new(b"gvar"),
    Tag::new(b"hsty"),
    Tag::new(b"just"),
    Tag::new(b"lcar"),
    Tag::new(b"mort"),
    Tag::new(b"morx"),
    Tag::new(b"opbd"),
    Tag::new(b"prop"),
    Tag::new(b"trak"),
    Tag::new(b"Zapf"),
    Tag::new(b"Silf"),
    Tag::new(b"Glat"),
    Tag::new(b"Gloc"),
    Tag::new(b"Feat"),
    Tag::new(b"Sill"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Woff2TableEntry {
    tag: Tag,
    orig_length: u32,
    /// Present only when the table is transformed.
    transform_length: Option<u32>,
}

impl Woff2TableEntry {
    fn read(cursor: &mut Cursor) -> Result<Self, ReadError> {
        let flags: u8 = cursor.read()?;
        let tag_index = flags & 0x3F;
        let tag = match KNOWN_TABLE_TAGS.get(tag_index as usize) {
            Some(tag) => *tag,
            None => cursor.read()?,
        };
        let transform_version = flags >> 6;
        let orig_length = read_uint_base128(cursor)?;
        // for glyf and loca, version 3 is the null transform
        let transformed = if tag == GLYF || tag == LOCA {
            transform_version != 3
        } else {
            transform_version != 0
        };
        let transform_length = if transformed {
            Some(read_uint_base128(cursor)?)
        } else {
            None
        };
        Ok(Woff2TableEntry {
            tag,
            orig_length,
            transform_length,
        })
    }

    fn is_transformed(&self) -> bool {
        self.transform_length.is_some()
    }

    /// The number of bytes this table occupies in the decompressed stream.
    fn stream_len(&self) -> usize {
        self.transform_length.unwrap_or(self.orig_length) as usize
    }
}

/// One font in the collection directory of a `ttcf` flavored file.
#[derive(Clone, Debug)]
struct CollectionFontEntry {
    flavor: u32,
    table_indices: Vec<u16>,
}

pub(super) fn read(data: FontData) -> Result<FontContainer, DecodeError> {
    if data.len() < WOFF2_HEADER_LEN {
        return Err(DecodeError::TruncatedContainer);
    }
    let flavor: u32 = data.read_at(4)?;
    let num_tables = data.read_at::<u16>(12)? as usize;
    let total_compressed_size = data.read_at::<u32>(20)? as usize;

    let mut cursor = data.cursor();
    cursor.advance_by(WOFF2_HEADER_LEN);
    let entries = (0..num_tables)
        .map(|_| Woff2TableEntry::read(&mut cursor))
        .collect::<Result<Vec<_>, _>>()?;

    let (flavor, keep) = if flavor == TTC_HEADER_TAG.to_u32() {
        let first = read_first_collection_font(&mut cursor, num_tables)?;
        let mut keep = vec![false; num_tables];
        for index in first.table_indices {
            keep[index as usize] = true;
        }
        (first.flavor, keep)
    } else {
        (flavor, vec![true; num_tables])
    };

    for entry in entries.iter().zip(&keep).filter_map(|(e, k)| k.then_some(e)) {
        if entry.is_transformed() && !OMITTED_TRANSFORMS.contains(&entry.tag) {
            log::debug!("'{}' table uses an unsupported WOFF2 transform", entry.tag);
            return Err(DecodeError::UnsupportedCompression(entry.tag));
        }
    }

    let compressed = data
        .slice_len(cursor.position(), total_compressed_size)
        .ok_or(DecodeError::TruncatedContainer)?;
    let stream_len = entries
        .iter()
        .try_fold(0usize, |sum, entry| sum.checked_add(entry.stream_len()))
        .ok_or(DecodeError::InvalidContainer("WOFF2 table lengths overflow"))?;
    let stream = woff_decompress::brotli_decode(compressed.as_bytes(), stream_len)
        .map_err(|e| DecodeError::CorruptCompressedData(format!("WOFF2 table stream: {e}")))?;
    if stream.len() != stream_len {
        return Err(DecodeError::CorruptCompressedData(format!(
            "WOFF2 table stream: expected {stream_len} bytes, decompressed {}",
            stream.len()
        )));
    }

    let mut tables = BTreeMap::new();
    let mut offset = 0;
    for (entry, keep) in entries.iter().zip(keep) {
        let range = offset..offset + entry.stream_len();
        offset = range.end;
        if !keep {
            continue;
        }
        if entry.is_transformed() {
            log::debug!("skipping transformed '{}' table", entry.tag);
            continue;
        }
        let table = stream.get(range).ok_or(DecodeError::TruncatedContainer)?;
        insert_table(
            &mut tables,
            entry.tag,
            TableEntry::new(Cow::Owned(table.to_vec()), None),
        );
    }
    Ok(FontContainer::new(
        FontFormat::Woff2,
        FontFormat::from_sfnt_version(flavor),
        tables,
    ))
}

/// Read the collection directory, returning only its first font.
///
/// Every font entry is still parsed, since the compressed stream begins
/// after the last of them.
fn read_first_collection_font(
    cursor: &mut Cursor,
    num_tables: usize,
) -> Result<CollectionFontEntry, DecodeError> {
    let _version: u32 = cursor.read()?;
    let num_fonts = read_255_u16(cursor)?;
    if num_fonts > 1 {
        log::debug!("WOFF2 collection contains {num_fonts} fonts, reading the first");
    }
    let mut first = None;
    for _ in 0..num_fonts {
        let font_num_tables = read_255_u16(cursor)?;
        let flavor: u32 = cursor.read()?;
        let mut table_indices = Vec::with_capacity(font_num_tables as usize);
        for _ in 0..font_num_tables {
            let index = read_255_u16(cursor)?;
            if index as usize >= num_tables {
                return Err(DecodeError::InvalidContainer(
                    "WOFF2 collection font references a missing table",
                ));
            }
            table_indices.push(index);
        }
        first.get_or_insert(CollectionFontEntry {
            flavor,
            table_indices,
        });
    }
    first.ok_or_else(|| {
        log::debug!("WOFF2 collection contains no fonts");
        DecodeError::TruncatedContainer
    })
}

/// <https://www.w3.org/TR/WOFF2/#DataTypes>
fn read_uint_base128(cursor: &mut Cursor) -> Result<u32, ReadError> {
    let mut accum = 0u32;
    for i in 0..5 {
        let byte: u8 = cursor.read()?;
        if i == 0 && byte == 0x80 {
            return Err(ReadError::MalformedData("UIntBase128 has leading zeros"));
        }
        if accum & 0xFE00_0000 != 0 {
            return Err(ReadError::MalformedData("UIntBase128 overflows u32"));
        }
        accum = (accum << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(accum);
        }
    }
    Err(ReadError::MalformedData("UIntBase128 longer than five bytes"))
}

/// <https://www.w3.org/TR/WOFF2/#DataTypes>
fn read_255_u16(cursor: &mut Cursor) -> Result<u16, ReadError> {
    const WORD_CODE: u8 = 253;
    const ONE_MORE_BYTE_CODE2: u8 = 254;
    const ONE_MORE_BYTE_CODE1: u8 = 255;
    const LOWEST_UCODE: u16 = 253;

    let code: u8 = cursor.read()?;
    match code {
        WORD_CODE => cursor.read(),
        ONE_MORE_BYTE_CODE1 => Ok(cursor.read::<u8>()? as u16 + LOWEST_UCODE),
        ONE_MORE_BYTE_CODE2 => Ok(cursor.read::<u8>()? as u16 + LOWEST_UCODE * 2),
        _ => Ok(code as u16),
    }
}
