//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use bytemuck::AnyBitPattern;
use types::{NameId, Tag};

use crate::font_data::FontData;

/// 'name'
pub const TAG: Tag = Tag::new(b"name");

const HEADER_LEN: usize = 6;
const RECORD_LEN: usize = 12;

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_WINDOWS: u16 = 3;
/// The Windows Unicode BMP encoding.
pub const WINDOWS_UNICODE_BMP: u16 = 1;
/// The Windows language id for US English.
pub const LANGUAGE_EN_US: u16 = 0x0409;

#[derive(Clone, Copy, Debug, AnyBitPattern)]
#[repr(C)]
struct RawNameRecord {
    platform_id: [u8; 2],
    encoding_id: [u8; 2],
    language_id: [u8; 2],
    name_id: [u8; 2],
    length: [u8; 2],
    string_offset: [u8; 2],
}

impl RawNameRecord {
    fn decode(&self, storage: FontData) -> Option<NameRecord> {
        let platform_id = u16::from_be_bytes(self.platform_id);
        let encoding_id = u16::from_be_bytes(self.encoding_id);
        let name_id = NameId::new(u16::from_be_bytes(self.name_id));
        let encoding = Encoding::new(platform_id, encoding_id);
        if encoding == Encoding::Unknown {
            return None;
        }
        let offset = u16::from_be_bytes(self.string_offset) as usize;
        let length = u16::from_be_bytes(self.length) as usize;
        let Some(data) = storage.slice_len(offset, length) else {
            log::debug!("name {name_id} ({platform_id}, {encoding_id}): string out of bounds");
            return None;
        };
        let Some(value) = encoding.decode(data.as_bytes()) else {
            log::debug!("name {name_id} ({platform_id}, {encoding_id}): invalid string data");
            return None;
        };
        Some(NameRecord {
            platform_id,
            encoding_id,
            language_id: u16::from_be_bytes(self.language_id),
            name_id,
            value,
        })
    }
}

/// A decoded entry in the naming table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: NameId,
    pub value: String,
}

impl NameRecord {
    /// `true` for the Windows platform with the Unicode BMP encoding.
    pub fn is_windows_unicode(&self) -> bool {
        self.platform_id == PLATFORM_WINDOWS && self.encoding_id == WINDOWS_UNICODE_BMP
    }

    /// `true` for any record stored as UTF-16: the Unicode platform and the
    /// Windows symbol, BMP and full repertoire encodings.
    pub fn is_unicode(&self) -> bool {
        Encoding::new(self.platform_id, self.encoding_id) == Encoding::Utf16Be
    }
}

/// Decode every record in a naming table whose string can be decoded.
///
/// Records are returned in table order. Records with an unsupported
/// encoding, or whose string is out of bounds or malformed, are skipped; if
/// the record array itself is cut short, the records that fit are returned.
pub fn decode_name(bytes: &[u8]) -> Vec<NameRecord> {
    let data = FontData::new(bytes);
    let (Ok(count), Ok(storage_offset)) = (data.read_at::<u16>(2), data.read_at::<u16>(4)) else {
        log::debug!("name table is too short for its header");
        return Vec::new();
    };
    let available = (bytes.len() - HEADER_LEN) / RECORD_LEN;
    let count = if count as usize > available {
        log::debug!("name table declares {count} records but holds {available}");
        available
    } else {
        count as usize
    };
    let Ok(records) =
        data.read_array::<RawNameRecord>(HEADER_LEN..HEADER_LEN + count * RECORD_LEN)
    else {
        return Vec::new();
    };
    let storage = data.split_off(storage_offset as usize).unwrap_or_default();
    records
        .iter()
        .filter_map(|record| record.decode(storage))
        .collect()
}

/// Choose the record to report for `name_id`.
///
/// A Windows Unicode BMP US English record wins, then the first UTF-16
/// record of the Windows or Unicode platforms, then the first Macintosh
/// record.
pub fn select_name(records: &[NameRecord], name_id: NameId) -> Option<&NameRecord> {
    let mut unicode = None;
    let mut mac = None;
    for record in records.iter().filter(|record| record.name_id == name_id) {
        if record.is_windows_unicode() && record.language_id == LANGUAGE_EN_US {
            return Some(record);
        }
        if record.is_unicode() {
            unicode.get_or_insert(record);
        } else if record.platform_id == PLATFORM_MACINTOSH {
            mac.get_or_insert(record);
        }
    }
    unicode.or(mac)
}

/// The encoding used by the name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (PLATFORM_UNICODE, _) => Encoding::Utf16Be,
            (PLATFORM_MACINTOSH, 0) => Encoding::MacRoman,
            (PLATFORM_WINDOWS, 0 | 1 | 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }

    /// Decode a string, failing on odd-length or unpaired UTF-16 data.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return None;
                }
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                char::decode_utf16(units).collect::<Result<_, _>>().ok()
            }
            Encoding::MacRoman => Some(bytes.iter().map(|b| MacRomanMapping.decode(*b)).collect()),
            Encoding::Unknown => None,
        }
    }
}

/// A helper for decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;
    /// Convert from a mac-roman encoded byte to a `char`
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            raw as char
        } else {
            let idx = raw - Self::START_REMAP;
            char::from_u32(MAC_ROMAN_DECODE[idx as usize] as u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    }
}

/// a lookup table for the Mac Roman encoding. this matches the values 128..=255
/// to specific unicode values.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

#[cfg(test)]
mod tests {
    use font_test_data::tables::{self, NameBuilder, EN_US, MAC_ROMAN, WINDOWS_UNICODE};
    use pretty_assertions::assert_eq;

    use super::*;

    const FRENCH: u16 = 0x040C;

    fn values(records: &[NameRecord]) -> Vec<&str> {
        records.iter().map(|record| record.value.as_str()).collect()
    }

    #[test]
    fn mac_roman() {
        let bytes = [b'M', 0x9F, 0x8E, 0x80, 0xF0];
        assert_eq!(
            Encoding::MacRoman.decode(&bytes).as_deref(),
            Some("Müé\u{c4}\u{f8ff}")
        );
    }

    #[test]
    fn utf16_surrogates() {
        // U+1F600 as a surrogate pair
        let pair = [0xD8, 0x3D, 0xDE, 0x00];
        assert_eq!(Encoding::Utf16Be.decode(&pair).as_deref(), Some("\u{1F600}"));
        // unpaired high surrogate
        assert_eq!(Encoding::Utf16Be.decode(&[0x09, 0x04, 0xD8, 0x00]), None);
        assert_eq!(Encoding::Utf16Be.decode(&[0x00, 0x41, 0x00]), None);
    }

    #[test]
    fn encodings() {
        assert_eq!(Encoding::new(0, 4), Encoding::Utf16Be);
        assert_eq!(Encoding::new(3, 10), Encoding::Utf16Be);
        assert_eq!(Encoding::new(1, 0), Encoding::MacRoman);
        assert_eq!(Encoding::new(1, 1), Encoding::Unknown);
        assert_eq!(Encoding::new(3, 2), Encoding::Unknown);
    }

    #[test]
    fn decode_basic_table() {
        let records = decode_name(&tables::basic_name_table());
        assert_eq!(records.len(), 13);
        assert_eq!(records[0].platform_id, PLATFORM_MACINTOSH);
        assert_eq!(records[0].value, "Mac Family");
        assert_eq!(records[2].name_id, NameId::FAMILY_NAME);
        assert_eq!(records[2].value, "Test Sans");
    }

    #[test]
    fn skips_undecodable_records() {
        let _ = env_logger::builder().is_test(true).try_init();
        let table = NameBuilder::new()
            .raw(WINDOWS_UNICODE, EN_US, 1, vec![0xD8, 0x00])
            .raw(WINDOWS_UNICODE, EN_US, 2, vec![0x00, 0x41, 0x00])
            .raw((3, 2), EN_US, 3, vec![0x00, 0x41])
            .windows(EN_US, 4, "Full")
            .build();
        let records = decode_name(&table);
        assert_eq!(values(&records), ["Full"]);
    }

    #[test]
    fn skips_out_of_range_string() {
        let mut table = NameBuilder::new()
            .windows(EN_US, 1, "Family")
            .windows(EN_US, 2, "Bold")
            .build();
        // point the second string past the end of storage
        table[HEADER_LEN + RECORD_LEN + 10..HEADER_LEN + RECORD_LEN + 12]
            .copy_from_slice(&1000u16.to_be_bytes());
        assert_eq!(values(&decode_name(&table)), ["Family"]);
    }

    #[test]
    fn truncated_record_array() {
        let table = NameBuilder::new()
            .windows(EN_US, 1, "Family")
            .windows(EN_US, 2, "Bold")
            .build();
        // one and a half records, and no storage at all
        let truncated = &table[..HEADER_LEN + RECORD_LEN + 6];
        let records = decode_name(truncated);
        assert!(records.is_empty());
        assert!(decode_name(&table[..3]).is_empty());
        assert!(decode_name(&[]).is_empty());
    }

    #[test]
    fn empty_strings_are_kept() {
        let table = NameBuilder::new().windows(EN_US, 1, "").build();
        assert_eq!(values(&decode_name(&table)), [""]);
    }

    #[test]
    fn prefers_us_english() {
        let records = decode_name(
            &NameBuilder::new()
                .mac(0, 1, "Mac")
                .windows(FRENCH, 1, "Français")
                .windows(EN_US, 1, "English")
                .build(),
        );
        let winner = select_name(&records, NameId::FAMILY_NAME).unwrap();
        assert_eq!(winner.value, "English");
    }

    #[test]
    fn falls_back_to_first_windows_record() {
        let records = decode_name(
            &NameBuilder::new()
                .mac(0, 1, "Mac")
                .windows(FRENCH, 1, "Français")
                .windows(0x0407, 1, "Deutsch")
                .build(),
        );
        let winner = select_name(&records, NameId::FAMILY_NAME).unwrap();
        assert_eq!(winner.value, "Français");
    }

    #[test]
    fn falls_back_to_first_mac_record() {
        let records = decode_name(
            &NameBuilder::new()
                .mac(1, 1, "First")
                .mac(0, 1, "Second")
                .build(),
        );
        let winner = select_name(&records, NameId::FAMILY_NAME).unwrap();
        assert_eq!(winner.value, "First");
    }

    #[test]
    fn unicode_platforms_rank_with_windows() {
        let records = decode_name(
            &NameBuilder::new()
                .mac(0, 1, "Mac")
                .raw((0, 3), 0, 1, tables::utf16_be("Unicode"))
                .raw((3, 10), EN_US, 4, tables::utf16_be("Full repertoire"))
                .build(),
        );
        assert_eq!(records.len(), 3);
        let family = select_name(&records, NameId::FAMILY_NAME).unwrap();
        assert_eq!(family.value, "Unicode");
        let full_name = select_name(&records, NameId::FULL_NAME).unwrap();
        assert_eq!(full_name.value, "Full repertoire");
        assert_eq!(select_name(&records, NameId::DESIGNER), None);
    }

    #[test]
    fn us_english_bmp_beats_earlier_unicode_records() {
        let records = decode_name(
            &NameBuilder::new()
                .raw((0, 4), 0, 1, tables::utf16_be("Unicode"))
                .windows(EN_US, 1, "English")
                .build(),
        );
        let winner = select_name(&records, NameId::FAMILY_NAME).unwrap();
        assert_eq!(winner.value, "English");
    }

    #[test]
    fn mac_records_use_mac_roman() {
        let table = NameBuilder::new()
            .raw(MAC_ROMAN, 0, 1, vec![b'C', b'a', b'f', 0x8E])
            .build();
        let records = decode_name(&table);
        assert_eq!(values(&records), ["Caf\u{e9}"]);
    }
}
