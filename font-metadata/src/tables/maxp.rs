//! The [maxp (Maximum Profile)](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::font_data::FontData;

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The length of a version 0.5 table.
pub const MIN_LEN: usize = 6;

pub const VERSION_0_5: u32 = 0x00005000;
pub const VERSION_1_0: u32 = 0x00010000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxpTable {
    pub version: u32,
    pub num_glyphs: u16,
}

/// Decode the glyph count, or `None` if the table is shorter than [`MIN_LEN`].
///
/// The version is reported but not checked; both 0.5 and 1.0 tables start
/// the same way.
pub fn decode_maxp(bytes: &[u8]) -> Option<MaxpTable> {
    let data = FontData::new(bytes).slice(..MIN_LEN)?;
    let version: u32 = data.read_at(0).ok()?;
    if version != VERSION_0_5 && version != VERSION_1_0 {
        log::debug!("unexpected maxp version {version:#010X}");
    }
    let num_glyphs = data.read_at(4).ok()?;
    Some(MaxpTable {
        version,
        num_glyphs,
    })
}
