use std::fmt::{Debug, Display, Formatter};

/// An OpenType tag.
///
/// [Per the OpenType spec][spec], a tag is a 4-byte array where each byte is in the
/// printable ASCII range `(0x20..=0x7E)`.
///
/// Tags are also used as file signatures (`OTTO`, `ttcf`, `wOFF`), so we do
/// not enforce this constraint: any four bytes read from a file must be
/// representable, if only so that they can be reported in an error.
///
/// [spec]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#data-types
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Construct a new `Tag` from a big-endian `u32`.
    ///
    /// Signatures such as the TrueType sfnt version (`0x00010000`) are
    /// usually written as integers; this lets them be compared with tags.
    pub const fn from_u32(src: u32) -> Self {
        Self::from_be_bytes(src.to_be_bytes())
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Return this tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.to_be_bytes()
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self::from_be_bytes(raw)
    }

    fn read(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self::from_raw)
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{:02X}}}", byte)?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "Tag({})", self)
    }
}

// a meaningless placeholder value.
impl Default for Tag {
    fn default() -> Self {
        Tag([b' '; 4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let bad_tag = Tag::new(&[0x19, b'z', b'@', 0x7F]);
        assert_eq!(bad_tag.to_string(), "{0x19}z@{0x7F}");
        assert_eq!(Tag::from_u32(0x00010000).to_string(), "{0x00}{0x01}{0x00}{0x00}");
        assert_eq!(Tag::new(b"OS/2").to_string(), "OS/2");
    }

    #[test]
    fn u32_round_trip() {
        let tag = Tag::new(b"OTTO");
        assert_eq!(tag.to_u32(), 0x4F54544F);
        assert_eq!(Tag::from_u32(tag.to_u32()), tag);
        assert_eq!(tag, "OTTO");
    }
}
