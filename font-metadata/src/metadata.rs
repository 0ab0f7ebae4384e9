//! Projecting decoded tables into a flat metadata record.

use types::NameId;

use crate::{
    container::FontContainer,
    tables::{
        maxp::{self, decode_maxp},
        name::{self, decode_name, select_name},
        os2::{self, decode_os2},
    },
};

/// Descriptive metadata for a single font.
///
/// Every field is optional: a font may lack a table, or a table may lack a
/// usable value. String fields are trimmed, and never empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontMetadata {
    /// Name id 1.
    pub family: Option<String>,
    /// Name id 2.
    pub subfamily: Option<String>,
    /// Name id 4.
    pub full_name: Option<String>,
    /// Name id 6.
    pub postscript_name: Option<String>,
    /// Name id 8.
    pub manufacturer: Option<String>,
    /// Name id 9.
    pub designer: Option<String>,
    /// Name id 0.
    pub copyright: Option<String>,
    /// Name id 11.
    pub vendor_url: Option<String>,
    /// Name id 13.
    pub licence_description: Option<String>,
    /// Name id 14.
    pub licence_url: Option<String>,
    /// `OS/2.achVendID`
    pub vendor_id: Option<String>,
    /// `OS/2.fsType`
    pub fs_type: Option<u16>,
    /// Name id 5.
    pub version: Option<String>,
    /// Name id 3.
    pub unique_id: Option<String>,
    /// The container the font was read from, such as `"WOFF2"`.
    pub file_format: Option<String>,
    /// `maxp.numGlyphs`
    pub num_glyphs: Option<u16>,
}

/// The name ids that feed a metadata field.
const PROJECTED_NAME_IDS: [NameId; 12] = [
    NameId::COPYRIGHT_NOTICE,
    NameId::FAMILY_NAME,
    NameId::SUBFAMILY_NAME,
    NameId::UNIQUE_ID,
    NameId::FULL_NAME,
    NameId::VERSION_STRING,
    NameId::POSTSCRIPT_NAME,
    NameId::MANUFACTURER,
    NameId::DESIGNER,
    NameId::VENDOR_URL,
    NameId::LICENSE_DESCRIPTION,
    NameId::LICENSE_URL,
];

impl FontMetadata {
    fn name_field(&mut self, name_id: NameId) -> Option<&mut Option<String>> {
        let field = match name_id {
            NameId::COPYRIGHT_NOTICE => &mut self.copyright,
            NameId::FAMILY_NAME => &mut self.family,
            NameId::SUBFAMILY_NAME => &mut self.subfamily,
            NameId::UNIQUE_ID => &mut self.unique_id,
            NameId::FULL_NAME => &mut self.full_name,
            NameId::VERSION_STRING => &mut self.version,
            NameId::POSTSCRIPT_NAME => &mut self.postscript_name,
            NameId::MANUFACTURER => &mut self.manufacturer,
            NameId::DESIGNER => &mut self.designer,
            NameId::VENDOR_URL => &mut self.vendor_url,
            NameId::LICENSE_DESCRIPTION => &mut self.licence_description,
            NameId::LICENSE_URL => &mut self.licence_url,
            _ => return None,
        };
        Some(field)
    }
}

/// Build a metadata record from the tables of a font.
pub fn project(font: &FontContainer) -> FontMetadata {
    let mut metadata = FontMetadata {
        file_format: Some(font.format().as_str().to_string()),
        ..Default::default()
    };

    let records = font
        .table_data(name::TAG)
        .map(decode_name)
        .unwrap_or_default();
    for name_id in PROJECTED_NAME_IDS {
        let value = select_name(&records, name_id).and_then(|record| clean(&record.value));
        if let Some(field) = metadata.name_field(name_id) {
            *field = value;
        }
    }

    if let Some(os2) = font.table_data(os2::TAG).and_then(decode_os2) {
        metadata.vendor_id = os2.vendor_id;
        metadata.fs_type = Some(os2.fs_type);
    }
    metadata.num_glyphs = font
        .table_data(maxp::TAG)
        .and_then(decode_maxp)
        .map(|maxp| maxp.num_glyphs);
    metadata
}

/// Trim a string, treating one that is left empty as absent.
fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
