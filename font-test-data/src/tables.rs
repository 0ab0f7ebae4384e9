//! Builders for the raw bytes of individual tables.

/// Windows platform, Unicode BMP encoding.
pub const WINDOWS_UNICODE: (u16, u16) = (3, 1);
/// Macintosh platform, Roman encoding.
pub const MAC_ROMAN: (u16, u16) = (1, 0);
/// The Windows language id for US English.
pub const EN_US: u16 = 0x0409;

/// One entry in a `name` table, with its string already encoded.
#[derive(Clone, Debug)]
pub struct RawNameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub bytes: Vec<u8>,
}

/// Assembles a version 0 `name` table.
///
/// Records are written in insertion order, which is how table order tests
/// control which record comes first.
#[derive(Clone, Debug, Default)]
pub struct NameBuilder {
    records: Vec<RawNameRecord>,
}

impl NameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record with pre-encoded string bytes.
    pub fn raw(
        mut self,
        (platform_id, encoding_id): (u16, u16),
        language_id: u16,
        name_id: u16,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.records.push(RawNameRecord {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            bytes: bytes.into(),
        });
        self
    }

    /// Add a Windows Unicode record, encoding `value` as UTF-16BE.
    pub fn windows(self, language_id: u16, name_id: u16, value: &str) -> Self {
        self.raw(WINDOWS_UNICODE, language_id, name_id, utf16_be(value))
    }

    /// Add a Macintosh Roman record.
    ///
    /// Only ASCII text is accepted; it is identical in Mac Roman.
    pub fn mac(self, language_id: u16, name_id: u16, value: &str) -> Self {
        assert!(value.is_ascii(), "mac fixtures must be ascii");
        self.raw(MAC_ROMAN, language_id, name_id, value.as_bytes())
    }

    pub fn build(&self) -> Vec<u8> {
        let count = self.records.len() as u16;
        let storage_offset = 6 + 12 * count;
        let mut buf = be_buffer! { 0u16, count, storage_offset };
        let mut storage = Vec::new();
        for record in &self.records {
            buf = buf
                .push(record.platform_id)
                .push(record.encoding_id)
                .push(record.language_id)
                .push(record.name_id)
                .push(record.bytes.len() as u16)
                .push(storage.len() as u16);
            storage.extend_from_slice(&record.bytes);
        }
        buf.extend_from_slice(&storage).into_vec()
    }
}

/// Encode a string as UTF-16BE bytes.
pub fn utf16_be(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// The length of a version 0 `OS/2` table.
pub const OS2_V0_LEN: usize = 78;
/// The length of a version 4 `OS/2` table.
pub const OS2_V4_LEN: usize = 96;

/// An `OS/2` table of `len` bytes with the embedding bits and vendor set.
///
/// Everything else is zero. `len` may be shorter than the version 0 minimum,
/// in which case the table is simply truncated.
pub fn os2(fs_type: u16, vendor: &[u8; 4], len: usize) -> Vec<u8> {
    let version: u16 = if len >= OS2_V4_LEN { 4 } else { 0 };
    let mut data = be_buffer! {
        version,
        500i16, // xAvgCharWidth
        400u16, // usWeightClass
        5u16,   // usWidthClass
        fs_type
    }
    .into_vec();
    data.resize(58, 0);
    data.extend_from_slice(vendor);
    data.resize(len.max(62), 0);
    data.truncate(len);
    data
}

/// A version 0.5 `maxp` table, as used by CFF fonts.
pub fn maxp(num_glyphs: u16) -> Vec<u8> {
    be_buffer! { 0x00005000u32, num_glyphs }.into_vec()
}

/// A version 1.0 `maxp` table, as used by TrueType fonts.
pub fn maxp_v1(num_glyphs: u16) -> Vec<u8> {
    let mut data = be_buffer! { 0x00010000u32, num_glyphs }.into_vec();
    data.resize(32, 0);
    data
}

/// A `head` table with the given checksum adjustment.
pub fn head(checksum_adjustment: u32) -> Vec<u8> {
    let mut data = be_buffer! {
        0x00010000u32,      // version
        0x00010000u32,      // fontRevision
        checksum_adjustment,
        0x5F0F3CF5u32,      // magicNumber
        0x000Bu16,          // flags
        1000u16             // unitsPerEm
    }
    .into_vec();
    data.resize(54, 0);
    data
}

/// A `name` table with a US English Windows record for every name id in a
/// metadata record, preceded by a Macintosh family name.
pub fn basic_name_table() -> Vec<u8> {
    NameBuilder::new()
        .mac(0, 1, "Mac Family")
        .windows(EN_US, 0, "Copyright 2024 Test Foundry")
        .windows(EN_US, 1, "Test Sans")
        .windows(EN_US, 2, "Regular")
        .windows(EN_US, 3, "1.000;TEST;TestSans-Regular")
        .windows(EN_US, 4, "Test Sans Regular")
        .windows(EN_US, 5, "Version 1.000")
        .windows(EN_US, 6, "TestSans-Regular")
        .windows(EN_US, 8, "Test Foundry")
        .windows(EN_US, 9, "A. Designer")
        .windows(EN_US, 11, "https://example.com")
        .windows(EN_US, 13, "Licensed under the SIL Open Font License, Version 1.1")
        .windows(EN_US, 14, "https://openfontlicense.org")
        .build()
}
