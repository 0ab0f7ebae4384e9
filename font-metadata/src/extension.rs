//! Declared file extensions.

use std::{fmt, path::Path, str::FromStr};

use crate::container::FontFormat;

/// A file extension accepted for font uploads.
///
/// The extension is advisory: the container is always detected from the
/// file's own signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontExtension {
    Ttf,
    Otf,
    Woff,
    Woff2,
}

/// The extension was not one of `.ttf`, `.otf`, `.woff` or `.woff2`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported file type. Allowed: .ttf, .otf, .woff, .woff2")]
pub struct UnsupportedExtension(pub String);

impl FontExtension {
    pub const ALL: [FontExtension; 4] = [
        FontExtension::Ttf,
        FontExtension::Otf,
        FontExtension::Woff,
        FontExtension::Woff2,
    ];

    /// The extension, without a leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            FontExtension::Ttf => "ttf",
            FontExtension::Otf => "otf",
            FontExtension::Woff => "woff",
            FontExtension::Woff2 => "woff2",
        }
    }

    /// The extension of a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UnsupportedExtension> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| UnsupportedExtension(path.display().to_string()))?
            .parse()
    }

    /// `true` if a file with this extension would normally hold `format`.
    ///
    /// `.ttf` is also used for collections, and `.otf` for TrueType
    /// outlines.
    pub fn expects(self, format: FontFormat) -> bool {
        matches!(
            (self, format),
            (FontExtension::Ttf, FontFormat::TrueType | FontFormat::Collection)
                | (FontExtension::Otf, FontFormat::OpenTypeCff | FontFormat::TrueType)
                | (FontExtension::Woff, FontFormat::Woff)
                | (FontExtension::Woff2, FontFormat::Woff2)
        )
    }
}

impl FromStr for FontExtension {
    type Err = UnsupportedExtension;

    /// Case-insensitive, with or without a leading dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.strip_prefix('.').unwrap_or(s);
        FontExtension::ALL
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(ext))
            .ok_or_else(|| UnsupportedExtension(s.to_string()))
    }
}

impl fmt::Display for FontExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("ttf".parse(), Ok(FontExtension::Ttf));
        assert_eq!(".OTF".parse(), Ok(FontExtension::Otf));
        assert_eq!("Woff".parse(), Ok(FontExtension::Woff));
        assert_eq!(".woff2".parse(), Ok(FontExtension::Woff2));
        assert_eq!(
            "ttc".parse::<FontExtension>(),
            Err(UnsupportedExtension("ttc".into()))
        );
        assert!("".parse::<FontExtension>().is_err());
        assert!("..ttf".parse::<FontExtension>().is_err());
    }

    #[test]
    fn paths() {
        assert_eq!(
            FontExtension::from_path("fonts/Test-Regular.WOFF2"),
            Ok(FontExtension::Woff2)
        );
        assert!(FontExtension::from_path("fonts/README").is_err());
        assert!(FontExtension::from_path("fonts/font.pdf").is_err());
    }

    #[test]
    fn error_message() {
        assert_eq!(
            UnsupportedExtension("pdf".into()).to_string(),
            "Unsupported file type. Allowed: .ttf, .otf, .woff, .woff2"
        );
    }

    #[test]
    fn expected_formats() {
        assert!(FontExtension::Ttf.expects(FontFormat::Collection));
        assert!(FontExtension::Otf.expects(FontFormat::TrueType));
        assert!(!FontExtension::Woff.expects(FontFormat::Woff2));
        assert!(!FontExtension::Ttf.expects(FontFormat::OpenTypeCff));
    }
}
