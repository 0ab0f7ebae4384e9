//! Name Identifiers
//!
//! Although these are treated as u16s in the OpenType spec, we choose to represent them
//! as a distinct type.

use core::fmt;

/// Identifier for an informational string (or name).
///
/// Only the identifiers that end up in a metadata record have associated
/// constants here; any other value can be constructed with [`NameId::new`].
///
/// For more detail, see <https://learn.microsoft.com/en-us/typography/opentype/spec/name#name-ids>
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NameId(u16);

impl NameId {
    /// Copyright notice.
    pub const COPYRIGHT_NOTICE: Self = Self(0);

    /// Font family name.
    pub const FAMILY_NAME: Self = Self(1);

    /// Font subfamily name.
    pub const SUBFAMILY_NAME: Self = Self(2);

    /// Unique font identifier.
    pub const UNIQUE_ID: Self = Self(3);

    /// Full font name that reflects all family and relevant subfamily descriptors.
    pub const FULL_NAME: Self = Self(4);

    /// Version string.
    ///
    /// Should begin with the syntax “Version number.number”.
    pub const VERSION_STRING: Self = Self(5);

    /// PostScript name for the font.
    pub const POSTSCRIPT_NAME: Self = Self(6);

    /// Manufacturer name.
    pub const MANUFACTURER: Self = Self(8);

    /// Name of the designer of the typeface.
    pub const DESIGNER: Self = Self(9);

    /// URL of font vendor (with protocol, e.g., http://, ftp://).
    pub const VENDOR_URL: Self = Self(11);

    /// License description.
    pub const LICENSE_DESCRIPTION: Self = Self(13);

    /// URL where additional licensing information can be found.
    pub const LICENSE_URL: Self = Self(14);
}

impl NameId {
    /// Create a new identifier from a raw u16 value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Return the identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for NameId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Self::COPYRIGHT_NOTICE => "COPYRIGHT_NOTICE",
            Self::FAMILY_NAME => "FAMILY_NAME",
            Self::SUBFAMILY_NAME => "SUBFAMILY_NAME",
            Self::UNIQUE_ID => "UNIQUE_ID",
            Self::FULL_NAME => "FULL_NAME",
            Self::VERSION_STRING => "VERSION_STRING",
            Self::POSTSCRIPT_NAME => "POSTSCRIPT_NAME",
            Self::MANUFACTURER => "MANUFACTURER",
            Self::DESIGNER => "DESIGNER",
            Self::VENDOR_URL => "VENDOR_URL",
            Self::LICENSE_DESCRIPTION => "LICENSE_DESCRIPTION",
            Self::LICENSE_URL => "LICENSE_URL",
            _ => return write!(f, "{}", self.0),
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
