//! test data shared between the font-metadata crates.
//!
//! Rather than checking in binary font files, fixtures are assembled from
//! small hand-built tables so that each test states exactly what the font
//! contains.

#[macro_use]
pub mod bebuffer;
pub mod font_builder;
pub mod tables;

use font_types::Tag;

pub use font_builder::{build_ttc, build_woff2_collection, compute_checksum, FontBuilder};

/// <https://github.com/google/woff2/blob/a0d0ed7da27b708c0a4e96ad7a998bddc933c06e/src/round.h#L19>
pub fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

/// The number of glyphs in the [`basic_font`] `maxp` table.
pub const BASIC_NUM_GLYPHS: u16 = 42;
/// The embedding bits in the [`basic_font`] `OS/2` table.
pub const BASIC_FS_TYPE: u16 = 0x0008;

/// A builder holding a `head`, `maxp`, `name` and `OS/2` table.
///
/// The `name` table is [`tables::basic_name_table`]; the vendor id is
/// `"TEST"`.
pub fn basic_font() -> FontBuilder {
    let mut builder = FontBuilder::new();
    builder
        .add_raw(Tag::new(b"head"), tables::head(0))
        .add_raw(Tag::new(b"maxp"), tables::maxp_v1(BASIC_NUM_GLYPHS))
        .add_raw(Tag::new(b"name"), tables::basic_name_table())
        .add_raw(
            Tag::new(b"OS/2"),
            tables::os2(BASIC_FS_TYPE, b"TEST", tables::OS2_V4_LEN),
        );
    builder
}
