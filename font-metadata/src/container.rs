//! The outer container of a font file.
//!
//! A font file is either a bare SFNT, a collection of SFNTs, or one of the
//! two WOFF wrappers. Whatever the container, reading it produces the same
//! thing: a map from table tag to the table's (decompressed) bytes.

mod sfnt;
mod woff;
mod woff2;

use std::borrow::Cow;
use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;

use types::{
    Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION, TYP1_SFNT_VERSION,
    WOFF2_SIGNATURE, WOFF_SIGNATURE,
};

use crate::{font_data::FontData, metadata::FontMetadata, read::DecodeError};

const HEAD: Tag = Tag::new(b"head");
/// Offset of `checksumAdjustment` in the `head` table.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// The container format of a font file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFormat {
    TrueType,
    OpenTypeCff,
    Woff,
    Woff2,
    Collection,
}

impl FontFormat {
    /// The name reported in the `file_format` metadata field.
    pub fn as_str(self) -> &'static str {
        match self {
            FontFormat::TrueType => "TrueType",
            FontFormat::OpenTypeCff => "OpenType-CFF",
            FontFormat::Woff => "WOFF",
            FontFormat::Woff2 => "WOFF2",
            FontFormat::Collection => "TrueType-Collection",
        }
    }

    /// The outline flavor named by an SFNT version, if it is one we know.
    pub fn from_sfnt_version(version: u32) -> Option<FontFormat> {
        match version {
            TT_SFNT_VERSION | TRUE_SFNT_VERSION | TYP1_SFNT_VERSION => Some(FontFormat::TrueType),
            CFF_SFNT_VERSION => Some(FontFormat::OpenTypeCff),
            _ => None,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bytes of a single table, and the checksum recorded for it.
#[derive(Clone, Debug)]
pub(crate) struct TableEntry<'a> {
    data: Cow<'a, [u8]>,
    checksum: Option<u32>,
}

impl<'a> TableEntry<'a> {
    pub(crate) fn borrowed(data: &'a [u8], checksum: u32) -> Self {
        TableEntry {
            data: Cow::Borrowed(data),
            checksum: Some(checksum),
        }
    }

    pub(crate) fn new(data: Cow<'a, [u8]>, checksum: Option<u32>) -> Self {
        TableEntry { data, checksum }
    }
}

/// A table whose data does not match the checksum in its directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumMismatch {
    pub tag: Tag,
    pub expected: u32,
    pub actual: u32,
}

/// The tables of a decoded font file.
///
/// Tables are borrowed from the input where they are stored uncompressed,
/// and owned otherwise. For collections only the first font is read.
#[derive(Clone, Debug)]
pub struct FontContainer<'a> {
    format: FontFormat,
    flavor: Option<FontFormat>,
    tables: BTreeMap<Tag, TableEntry<'a>>,
}

impl<'a> FontContainer<'a> {
    /// Detect the container from its leading signature and read its tables.
    pub fn read(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let data = FontData::new(bytes);
        let signature: Tag = data
            .read_at(0)
            .map_err(|_| DecodeError::UnrecognizedFormat)?;
        match signature {
            WOFF_SIGNATURE => woff::read(data),
            WOFF2_SIGNATURE => woff2::read(data),
            TTC_HEADER_TAG => sfnt::read_collection(data),
            _ => match FontFormat::from_sfnt_version(signature.to_u32()) {
                Some(format) => sfnt::read(data, format),
                None => {
                    log::debug!("unrecognized font signature '{signature}'");
                    Err(DecodeError::UnrecognizedFormat)
                }
            },
        }
    }

    pub(crate) fn new(
        format: FontFormat,
        flavor: Option<FontFormat>,
        tables: BTreeMap<Tag, TableEntry<'a>>,
    ) -> Self {
        log::debug!("read {} tables from {format} container", tables.len());
        FontContainer {
            format,
            flavor,
            tables,
        }
    }

    /// The container this font was read from.
    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// The outline flavor of the (first) SFNT inside the container.
    ///
    /// This is `None` for a WOFF or WOFF2 file whose flavor field is not a
    /// known SFNT version.
    pub fn flavor(&self) -> Option<FontFormat> {
        self.flavor
    }

    /// The bytes of the table with this tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(|entry| entry.data.as_ref())
    }

    /// The tags of all tables, in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tables.keys().copied()
    }

    /// The number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Compare each table against the checksum in its directory entry.
    ///
    /// WOFF2 does not record per-table checksums, so those tables are never
    /// reported. A mismatch is not an error; each one is logged and returned.
    pub fn validate_checksums(&self) -> Vec<ChecksumMismatch> {
        let mut mismatches = Vec::new();
        for (tag, entry) in &self.tables {
            let Some(expected) = entry.checksum else {
                continue;
            };
            let actual = table_checksum(*tag, &entry.data);
            if actual != expected {
                log::warn!(
                    "checksum mismatch for '{tag}': expected {expected:#010X}, computed {actual:#010X}"
                );
                mismatches.push(ChecksumMismatch {
                    tag: *tag,
                    expected,
                    actual,
                });
            }
        }
        mismatches
    }

    /// Project the tables into a metadata record.
    pub fn metadata(&self) -> FontMetadata {
        crate::metadata::project(self)
    }
}

/// Insert a table, keeping the first of any duplicate tags.
pub(crate) fn insert_table<'a>(
    tables: &mut BTreeMap<Tag, TableEntry<'a>>,
    tag: Tag,
    entry: TableEntry<'a>,
) {
    match tables.entry(tag) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(_) => {
            log::warn!("duplicate '{tag}' table in directory, keeping the first")
        }
    }
}

/// The OpenType table checksum: the wrapping sum of big-endian u32 words.
///
/// The final word is zero padded. For `head`, `checksumAdjustment` is
/// treated as zero.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#calculating-checksums>
pub fn table_checksum(tag: Tag, data: &[u8]) -> u32 {
    let mut sum = 0u32;
    for (i, chunk) in data.chunks(4).enumerate() {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        if tag == HEAD && i * 4 == CHECKSUM_ADJUSTMENT_OFFSET {
            word = [0; 4];
        }
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}
