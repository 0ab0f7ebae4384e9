//! The [OS/2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use types::Tag;

use crate::font_data::FontData;

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// The length of a version 0 table, the shortest that is accepted.
pub const MIN_LEN: usize = 78;

const FS_TYPE_OFFSET: usize = 8;
const ACH_VEND_ID_OFFSET: usize = 58;

/// The fields of the `OS/2` table that are reported as metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Os2Table {
    /// `achVendID`, with trailing spaces and NULs removed.
    pub vendor_id: Option<String>,
    /// The embedding licensing rights.
    pub fs_type: u16,
}

/// Decode the `OS/2` table, or `None` if it is shorter than [`MIN_LEN`].
pub fn decode_os2(bytes: &[u8]) -> Option<Os2Table> {
    if bytes.len() < MIN_LEN {
        log::debug!("OS/2 table is {} bytes, need at least {MIN_LEN}", bytes.len());
        return None;
    }
    let data = FontData::new(bytes);
    let fs_type = data.read_at(FS_TYPE_OFFSET).ok()?;
    let vendor: Tag = data.read_at(ACH_VEND_ID_OFFSET).ok()?;
    Some(Os2Table {
        vendor_id: vendor_string(vendor),
        fs_type,
    })
}

fn vendor_string(vendor: Tag) -> Option<String> {
    let raw: String = vendor.to_be_bytes().iter().map(|b| *b as char).collect();
    let trimmed = raw.trim_end_matches([' ', '\0']);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
