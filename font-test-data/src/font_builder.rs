//! Assemble raw tables into complete font files.
//!
//! The same set of tables can be written as a bare SFNT, as part of a
//! collection, or wrapped in WOFF or WOFF2, which lets tests check that every
//! container produces the same metadata.

use std::collections::BTreeMap;
use std::io::Write;

use font_types::{Tag, TTC_HEADER_TAG, TT_SFNT_VERSION, WOFF2_SIGNATURE, WOFF_SIGNATURE};

use crate::bebuffer::BeBuffer;
use crate::round4;

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;

/// Flag value meaning "an explicit tag follows" in a WOFF2 directory entry.
const WOFF2_EXPLICIT_TAG: u8 = 63;

#[derive(Clone, Debug)]
struct Woff2Transform {
    version: u8,
    data: Vec<u8>,
}

/// Build a font from some set of tables.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
    woff2_transforms: BTreeMap<Tag, Woff2Transform>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        FontBuilder {
            sfnt_version: TT_SFNT_VERSION,
            tables: Default::default(),
            woff2_transforms: Default::default(),
        }
    }
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sfnt version (or WOFF flavor) written into the header.
    pub fn sfnt_version(&mut self, version: u32) -> &mut Self {
        self.sfnt_version = version;
        self
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Mark a table as transformed when written as WOFF2.
    ///
    /// `data` is written to the compressed stream in place of the table's
    /// own bytes, and `version` into the high bits of the directory flags.
    pub fn woff2_transform(
        &mut self,
        tag: Tag,
        version: u8,
        data: impl Into<Vec<u8>>,
    ) -> &mut Self {
        let data = data.into();
        self.woff2_transforms
            .insert(tag, Woff2Transform { version, data });
        self
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&self) -> Vec<u8> {
        let header_len = SFNT_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let buf = self.write_table_directory(BeBuffer::new(), header_len);
        self.write_table_data(buf).into_vec()
    }

    /// Assemble a [WOFF 1.0](https://www.w3.org/TR/WOFF/) file.
    ///
    /// Tables are zlib compressed unless that would not make them smaller,
    /// in which case they are stored as-is, exactly as the format requires.
    pub fn build_woff(&self) -> Vec<u8> {
        let stored: Vec<_> = self
            .tables
            .iter()
            .map(|(tag, data)| {
                let compressed = zlib_encode(data);
                let payload = if compressed.len() < data.len() {
                    compressed
                } else {
                    data.clone()
                };
                (*tag, payload, data)
            })
            .collect();

        let header_len = WOFF_HEADER_LEN + stored.len() * WOFF_ENTRY_LEN;
        let total_len: usize =
            header_len + stored.iter().map(|(_, p, _)| round4(p.len())).sum::<usize>();

        let mut buf = be_buffer! {
            WOFF_SIGNATURE,
            self.sfnt_version,
            total_len as u32,
            stored.len() as u16,
            0u16, // reserved
            self.total_sfnt_size(),
            1u16, // majorVersion
            0u16, // minorVersion
            0u32, // metaOffset
            0u32, // metaLength
            0u32, // metaOrigLength
            0u32, // privOffset
            0u32  // privLength
        };

        let mut position = header_len;
        for (tag, payload, data) in &stored {
            buf = buf
                .push(*tag)
                .push(position as u32)
                .push(payload.len() as u32)
                .push(data.len() as u32)
                .push(compute_checksum(data));
            position += round4(payload.len());
        }
        for (_, payload, _) in &stored {
            buf = buf.extend_from_slice(payload).pad_to_4();
        }
        buf.into_vec()
    }

    /// Assemble a [WOFF 2.0](https://www.w3.org/TR/WOFF2/) file.
    pub fn build_woff2(&self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut stream = Vec::new();
        for (tag, data) in &self.tables {
            self.write_woff2_entry(*tag, data, &mut directory, &mut stream);
        }
        assemble_woff2(
            self.sfnt_version,
            self.tables.len(),
            self.total_sfnt_size(),
            &directory,
            &stream,
        )
    }

    fn total_sfnt_size(&self) -> u32 {
        let header_len = SFNT_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let data_len: usize = self.tables.values().map(|data| round4(data.len())).sum();
        (header_len + data_len) as u32
    }

    fn write_table_directory(&self, buf: BeBuffer, data_start: usize) -> BeBuffer {
        let mut buf = sfnt_header(buf, self.sfnt_version, self.tables.len());
        let mut position = data_start;
        for (tag, data) in &self.tables {
            buf = buf
                .push(*tag)
                .push(compute_checksum(data))
                .push(position as u32)
                .push(data.len() as u32);
            position += round4(data.len());
        }
        buf
    }

    fn write_table_data(&self, mut buf: BeBuffer) -> BeBuffer {
        for data in self.tables.values() {
            buf = buf.extend_from_slice(data).pad_to_4();
        }
        buf
    }

    fn tables_len(&self) -> usize {
        self.tables.values().map(|data| round4(data.len())).sum()
    }

    fn write_woff2_entry(
        &self,
        tag: Tag,
        data: &[u8],
        directory: &mut Vec<u8>,
        stream: &mut Vec<u8>,
    ) {
        let (version, payload) = match self.woff2_transforms.get(&tag) {
            Some(transform) => (transform.version, transform.data.as_slice()),
            None => (null_transform_version(tag), data),
        };
        let flags = known_tag_index(tag).unwrap_or(WOFF2_EXPLICIT_TAG) | (version << 6);
        directory.push(flags);
        if flags & 0x3F == WOFF2_EXPLICIT_TAG {
            directory.extend_from_slice(&tag.to_be_bytes());
        }
        push_base128(directory, data.len() as u32);
        if is_transformed(tag, version) {
            push_base128(directory, payload.len() as u32);
        }
        stream.extend_from_slice(payload);
    }
}

/// Assemble a [font collection] from several fonts.
///
/// Each font gets its own table directory; table data is not shared.
///
/// [font collection]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#font-collections
pub fn build_ttc(fonts: &[&FontBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut directory_offsets = Vec::with_capacity(fonts.len());
    let mut position = header_len;
    for font in fonts {
        directory_offsets.push(position as u32);
        position += SFNT_HEADER_LEN + font.tables.len() * TABLE_RECORD_LEN;
    }

    let mut buf = be_buffer! {
        TTC_HEADER_TAG,
        1u16, // majorVersion
        0u16, // minorVersion
        fonts.len() as u32
    }
    .extend(directory_offsets);

    for font in fonts {
        buf = font.write_table_directory(buf, position);
        position += font.tables_len();
    }
    for font in fonts {
        buf = font.write_table_data(buf);
    }
    buf.into_vec()
}

/// Assemble a WOFF2 file whose flavor is `ttcf`, containing several fonts.
pub fn build_woff2_collection(fonts: &[&FontBuilder]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut stream = Vec::new();
    let mut collection_directory = be_buffer! { 0x00010000u32 }.into_vec();
    push_255_u16(&mut collection_directory, fonts.len() as u16);

    let mut index = 0u16;
    let mut num_tables = 0;
    let mut total_sfnt_size = 12 + 4 * fonts.len() as u32;
    for font in fonts {
        push_255_u16(&mut collection_directory, font.tables.len() as u16);
        collection_directory.extend_from_slice(&font.sfnt_version.to_be_bytes());
        for (tag, data) in &font.tables {
            font.write_woff2_entry(*tag, data, &mut directory, &mut stream);
            push_255_u16(&mut collection_directory, index);
            index += 1;
        }
        num_tables += font.tables.len();
        total_sfnt_size += font.total_sfnt_size();
    }
    directory.extend_from_slice(&collection_directory);
    assemble_woff2(
        TTC_HEADER_TAG.to_u32(),
        num_tables,
        total_sfnt_size,
        &directory,
        &stream,
    )
}

fn assemble_woff2(
    flavor: u32,
    num_tables: usize,
    total_sfnt_size: u32,
    directory: &[u8],
    stream: &[u8],
) -> Vec<u8> {
    let compressed = brotli_encode(stream);
    let mut buf = BeBuffer::new()
        .push(WOFF2_SIGNATURE)
        .push(flavor)
        .push_with_tag(0u32, "length")
        .push(num_tables as u16)
        .push(0u16) // reserved
        .push(total_sfnt_size)
        .push(compressed.len() as u32)
        .push(1u16) // majorVersion
        .push(0u16) // minorVersion
        .extend([0u32; 5]) // metadata and private blocks
        .extend_from_slice(directory)
        .extend_from_slice(&compressed)
        .pad_to_4();
    let len = buf.len() as u32;
    buf.write_at("length", len);
    buf.into_vec()
}

fn sfnt_header(buf: BeBuffer, sfnt_version: u32, num_tables: usize) -> BeBuffer {
    // See https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    let num_tables = num_tables as u16;
    let entry_selector = num_tables.checked_ilog2().unwrap_or(0) as u16;
    let search_range = if num_tables == 0 {
        0
    } else {
        (1u16 << entry_selector) * TABLE_RECORD_LEN as u16
    };
    let range_shift = (num_tables * TABLE_RECORD_LEN as u16).saturating_sub(search_range);
    buf.push(sfnt_version)
        .push(num_tables)
        .push(search_range)
        .push(entry_selector)
        .push(range_shift)
}

/// The OpenType table checksum: the wrapping sum of the data as big-endian
/// u32s, zero padded to a multiple of four bytes.
pub fn compute_checksum(data: &[u8]) -> u32 {
    data.chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(word)
        })
        .fold(0u32, u32::wrapping_add)
}

fn null_transform_version(tag: Tag) -> u8 {
    if tag == "glyf" || tag == "loca" {
        3
    } else {
        0
    }
}

fn is_transformed(tag: Tag, version: u8) -> bool {
    version != null_transform_version(tag)
}

// A subset of the WOFF2 known table list, enough to exercise both the
// indexed and the explicit tag forms.
fn known_tag_index(tag: Tag) -> Option<u8> {
    match &tag.to_be_bytes() {
        b"cmap" => Some(0),
        b"head" => Some(1),
        b"hhea" => Some(2),
        b"hmtx" => Some(3),
        b"maxp" => Some(4),
        b"name" => Some(5),
        b"OS/2" => Some(6),
        b"post" => Some(7),
        b"glyf" => Some(10),
        b"loca" => Some(11),
        _ => None,
    }
}

fn push_base128(out: &mut Vec<u8>, mut value: u32) {
    let mut groups = Vec::with_capacity(5);
    loop {
        groups.push((value & 0x7F) as u8);
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    let last = groups.len() - 1;
    for (i, group) in groups.iter().rev().enumerate() {
        out.push(if i == last { *group } else { group | 0x80 });
    }
}

fn push_255_u16(out: &mut Vec<u8>, value: u16) {
    match value {
        0..=252 => out.push(value as u8),
        253..=505 => out.extend_from_slice(&[255, (value - 253) as u8]),
        506..=761 => out.extend_from_slice(&[254, (value - 506) as u8]),
        _ => {
            out.push(253);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

fn zlib_encode(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn brotli_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 9, 22);
        writer.write_all(data).unwrap();
    }
    out
}
