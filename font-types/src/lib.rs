//! Common [scalar data types][data types] used in font files
//!
//! This crate holds the handful of primitive types shared by the container
//! reader and the test fixtures: four-byte [`Tag`]s, [`NameId`]s, and the
//! [`Scalar`] trait used for big-endian decoding.
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod name_id;
mod raw;
mod tag;

pub use name_id::NameId;
pub use raw::Scalar;
pub use tag::Tag;

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version for fonts containing CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The SFNT version used by legacy Apple TrueType fonts ('true').
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
/// The SFNT version used by legacy Apple PostScript fonts ('typ1').
pub const TYP1_SFNT_VERSION: u32 = 0x74797031;

/// The header tag for a font collection file.
pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");
/// The signature of a [WOFF 1.0](https://www.w3.org/TR/WOFF/) file.
pub const WOFF_SIGNATURE: Tag = Tag::new(b"wOFF");
/// The signature of a [WOFF 2.0](https://www.w3.org/TR/WOFF2/) file.
pub const WOFF2_SIGNATURE: Tag = Tag::new(b"wOF2");
