//! End to end properties of `parse_font`, across every container.

use font_metadata::{parse_font, types::Tag, DecodeError, FontMetadata};
use font_test_data::{
    basic_font, build_ttc,
    tables::{self, NameBuilder, EN_US},
    FontBuilder, BASIC_FS_TYPE, BASIC_NUM_GLYPHS,
};
use pretty_assertions::assert_eq;

const NAME: Tag = Tag::new(b"name");
const OS2: Tag = Tag::new(b"OS/2");
const MAXP: Tag = Tag::new(b"maxp");

fn without_format(metadata: FontMetadata) -> FontMetadata {
    FontMetadata {
        file_format: None,
        ..metadata
    }
}

#[test]
fn every_container_reports_its_format() {
    let font = basic_font();
    let mut cff = basic_font();
    cff.sfnt_version(font_metadata::types::CFF_SFNT_VERSION)
        .add_raw(MAXP, tables::maxp(BASIC_NUM_GLYPHS));
    let cases = [
        (font.build(), "ttf", "TrueType"),
        (cff.build(), "otf", "OpenType-CFF"),
        (build_ttc(&[&font]), "ttf", "TrueType-Collection"),
        (font.build_woff(), "woff", "WOFF"),
        (font.build_woff2(), "woff2", "WOFF2"),
    ];
    for (bytes, ext, format) in cases {
        let metadata = parse_font(&bytes, ext).unwrap();
        assert_eq!(metadata.file_format.as_deref(), Some(format));
        assert_eq!(metadata.num_glyphs, Some(BASIC_NUM_GLYPHS));
    }
}

#[test]
fn parsing_is_idempotent() {
    let bytes = basic_font().build_woff2();
    assert_eq!(parse_font(&bytes, "woff2"), parse_font(&bytes, "woff2"));
}

#[test]
fn wrappers_agree() {
    let font = basic_font();
    let sfnt = parse_font(&font.build(), "ttf").unwrap();
    let woff = parse_font(&font.build_woff(), "woff").unwrap();
    let woff2 = parse_font(&font.build_woff2(), "woff2").unwrap();
    assert_eq!(sfnt.family.as_deref(), Some("Test Sans"));
    assert_eq!(sfnt.fs_type, Some(BASIC_FS_TYPE));
    assert_eq!(without_format(woff), without_format(sfnt.clone()));
    assert_eq!(without_format(woff2), without_format(sfnt));
}

#[test]
fn mac_only_family() {
    let mut font = FontBuilder::new();
    font.add_raw(NAME, NameBuilder::new().mac(0, 1, "Mac Only").build());
    let metadata = parse_font(&font.build(), "ttf").unwrap();
    assert_eq!(metadata.family.as_deref(), Some("Mac Only"));
}

#[test]
fn unicode_platform_names_are_reported() {
    let mut font = FontBuilder::new();
    font.add_raw(
        NAME,
        NameBuilder::new()
            .raw((0, 3), 0, 1, tables::utf16_be("Uni Family"))
            .raw((3, 10), EN_US, 4, tables::utf16_be("Full Rep"))
            .build(),
    );
    let metadata = parse_font(&font.build(), "ttf").unwrap();
    assert_eq!(metadata.family.as_deref(), Some("Uni Family"));
    assert_eq!(metadata.full_name.as_deref(), Some("Full Rep"));
}

#[test]
fn us_english_wins() {
    let mut font = FontBuilder::new();
    font.add_raw(
        NAME,
        NameBuilder::new()
            .windows(0x0411, 4, "Japanese Full Name")
            .windows(EN_US, 4, "English Full Name")
            .build(),
    );
    let metadata = parse_font(&font.build_woff(), "woff").unwrap();
    assert_eq!(metadata.full_name.as_deref(), Some("English Full Name"));
}

#[test]
fn truncated_fonts_fail() {
    for bytes in [
        basic_font().build(),
        basic_font().build_woff(),
        basic_font().build_woff2(),
        build_ttc(&[&basic_font()]),
    ] {
        let result = parse_font(&bytes[..10], "ttf");
        assert!(
            matches!(
                result,
                Err(DecodeError::TruncatedContainer) | Err(DecodeError::UnrecognizedFormat)
            ),
            "{result:?}"
        );
    }
}

#[test]
fn zeros_are_unrecognized() {
    assert_eq!(
        parse_font(&[0u8; 200], "ttf"),
        Err(DecodeError::UnrecognizedFormat)
    );
}

#[test]
fn short_os2_is_absent() {
    let mut font = basic_font();
    font.add_raw(OS2, tables::os2(0x0004, b"ABCD", 60));
    let metadata = parse_font(&font.build(), "ttf").unwrap();
    assert_eq!(metadata.vendor_id, None);
    assert_eq!(metadata.fs_type, None);
    assert_eq!(metadata.num_glyphs, Some(BASIC_NUM_GLYPHS));
}

#[test]
fn missing_maxp() {
    let mut font = FontBuilder::new();
    font.add_raw(NAME, tables::basic_name_table())
        .add_raw(OS2, tables::os2(0, b"TEST", tables::OS2_V0_LEN));
    let metadata = parse_font(&font.build(), "ttf").unwrap();
    assert_eq!(metadata.num_glyphs, None);
    assert_eq!(metadata.family.as_deref(), Some("Test Sans"));
    assert_eq!(metadata.vendor_id.as_deref(), Some("TEST"));
    assert_eq!(metadata.fs_type, Some(0));
}

#[test]
fn woff2_with_transformed_glyphs() {
    let glyf = Tag::new(b"glyf");
    let loca = Tag::new(b"loca");
    let mut font = basic_font();
    font.add_raw(glyf, vec![0; 64])
        .add_raw(loca, vec![0; 10])
        .woff2_transform(glyf, 0, vec![1; 40])
        .woff2_transform(loca, 0, Vec::new());
    let metadata = parse_font(&font.build_woff2(), "woff2").unwrap();
    let expected = parse_font(&basic_font().build(), "ttf").unwrap();
    assert_eq!(without_format(metadata), without_format(expected));
}

#[test]
fn json_shape() {
    let mut font = FontBuilder::new();
    font.add_raw(NAME, NameBuilder::new().windows(EN_US, 1, "Only Family").build());
    let metadata = parse_font(&font.build(), "ttf").unwrap();
    let json = serde_json::to_value(&metadata).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 16);
    assert_eq!(json["family"], "Only Family");
    assert_eq!(json["file_format"], "TrueType");
    assert!(json["licence_url"].is_null());
    assert!(json["num_glyphs"].is_null());
}
