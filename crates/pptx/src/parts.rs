//! Package-level parts: content types, relationships, presentation,
//! master, layout, theme and document properties.

use crate::xml::{XmlBuilder, NS_A, NS_P, NS_R};
use crate::{color_or, emu};
use slidecast_core::profile::StyleProfile;
use slidecast_core::{DocumentMetadata, FontRole, Result};

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// First slide id allowed by PresentationML.
const FIRST_SLIDE_ID: usize = 256;

/// Relationship id of the first slide in presentation.xml.rels.
const FIRST_SLIDE_REL: usize = 3;

pub(crate) fn slide_part_name(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

pub(crate) fn content_types(slide_count: usize) -> Result<Vec<u8>> {
    const PRESENTATIONML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

    let mut xml = XmlBuilder::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let overrides = [
        ("/ppt/presentation.xml", format!("{}.presentation.main+xml", PRESENTATIONML)),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{}.slideMaster+xml", PRESENTATIONML)),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{}.slideLayout+xml", PRESENTATIONML)),
        (
            "/ppt/theme/theme1.xml",
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", *part), ("ContentType", content_type.as_str())],
        )?;
    }

    let slide_type = format!("{}.slide+xml", PRESENTATIONML);
    for number in 1..=slide_count {
        let part = format!("/{}", slide_part_name(number));
        xml.empty("Override", &[("PartName", &part), ("ContentType", &slide_type)])?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

/// A relationships part from `(type, target)` pairs, numbered `rId1..`.
pub(crate) fn relationships(rels: &[(&str, String)]) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    for (index, (rel_type, target)) in rels.iter().enumerate() {
        let id = format!("rId{}", index + 1);
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

pub(crate) fn root_relationships() -> Result<Vec<u8>> {
    relationships(&[
        (REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
        (REL_CORE_PROPERTIES, "docProps/core.xml".to_string()),
        (REL_EXTENDED_PROPERTIES, "docProps/app.xml".to_string()),
    ])
}

pub(crate) fn presentation_relationships(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        (REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        (REL_THEME, "theme/theme1.xml".to_string()),
    ];
    for number in 1..=slide_count {
        rels.push((REL_SLIDE, format!("slides/slide{}.xml", number)));
    }
    relationships(&rels)
}

pub(crate) fn master_relationships() -> Result<Vec<u8>> {
    relationships(&[
        (REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
        (REL_THEME, "../theme/theme1.xml".to_string()),
    ])
}

pub(crate) fn layout_relationships() -> Result<Vec<u8>> {
    relationships(&[(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml".to_string())])
}

pub(crate) fn slide_relationships() -> Result<Vec<u8>> {
    relationships(&[(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string())])
}

pub(crate) fn presentation(profile: &StyleProfile, slide_count: usize) -> Result<Vec<u8>> {
    let layout = &profile.design.layout;

    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P), ("saveSubsetFonts", "1")],
    )?;

    xml.start("p:sldMasterIdLst", &[])?
        .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
        .end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        xml.start("p:sldIdLst", &[])?;
        for index in 0..slide_count {
            let id = (FIRST_SLIDE_ID + index).to_string();
            let rel = format!("rId{}", FIRST_SLIDE_REL + index);
            xml.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
        }
        xml.end("p:sldIdLst")?;
    }

    xml.empty(
        "p:sldSz",
        &[
            ("cx", &emu(layout.slide_width).to_string()),
            ("cy", &emu(layout.slide_height).to_string()),
        ],
    )?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

/// Empty shape tree header shared by master, layout and slides.
pub(crate) fn group_shape_properties(xml: &mut XmlBuilder) -> Result<()> {
    xml.raw(concat!(
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    ))?;
    Ok(())
}

pub(crate) fn slide_master(profile: &StyleProfile) -> Result<Vec<u8>> {
    let background = color_or(&profile.design.theme.background_color, "FFFFFF");

    let mut xml = XmlBuilder::new()?;
    xml.start("p:sldMaster", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.start("p:cSld", &[])?;
    xml.start("p:bg", &[])?
        .start("p:bgPr", &[])?
        .start("a:solidFill", &[])?
        .empty("a:srgbClr", &[("val", &background)])?
        .end("a:solidFill")?
        .empty("a:effectLst", &[])?
        .end("p:bgPr")?
        .end("p:bg")?;
    xml.start("p:spTree", &[])?;
    group_shape_properties(&mut xml)?;
    xml.end("p:spTree")?.end("p:cSld")?;

    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    xml.start("p:sldLayoutIdLst", &[])?
        .empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?
        .end("p:sldLayoutIdLst")?;

    xml.start("p:txStyles", &[])?;
    for style in ["p:titleStyle", "p:bodyStyle", "p:otherStyle"] {
        xml.start(style, &[])?
            .raw("<a:lvl1pPr><a:defRPr/></a:lvl1pPr>")?
            .end(style)?;
    }
    xml.end("p:txStyles")?;

    xml.end("p:sldMaster")?;
    Ok(xml.finish())
}

pub(crate) fn slide_layout() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    xml.start("p:cSld", &[("name", "Blank")])?
        .start("p:spTree", &[])?;
    group_shape_properties(&mut xml)?;
    xml.end("p:spTree")?.end("p:cSld")?;
    xml.raw("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>")?;
    xml.end("p:sldLayout")?;
    Ok(xml.finish())
}

/// Format scheme required by every theme; content is fixed.
const FORMAT_SCHEME: &str = concat!(
    r#"<a:fmtScheme name="Office">"#,
    r#"<a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
    r#"<a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
    r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst>"#,
    r#"</a:fmtScheme>"#,
);

pub(crate) fn theme(profile: &StyleProfile) -> Result<Vec<u8>> {
    let theme = &profile.design.theme;
    let primary = color_or(&theme.primary_color, "2C5F2D");
    let secondary = color_or(&theme.secondary_color, "97BC62");
    let background = color_or(&theme.background_color, "FFFFFF");
    let major = profile
        .font(FontRole::Title)
        .map(|f| f.family.as_str())
        .unwrap_or("Arial");
    let minor = profile
        .font(FontRole::Body)
        .map(|f| f.family.as_str())
        .unwrap_or("Arial");

    let mut xml = XmlBuilder::new()?;
    xml.start("a:theme", &[("xmlns:a", NS_A), ("name", &profile.template.name)])?;
    xml.start("a:themeElements", &[])?;

    xml.start("a:clrScheme", &[("name", &profile.template.name)])?;
    let scheme = [
        ("a:dk1", "000000"),
        ("a:lt1", background.as_str()),
        ("a:dk2", primary.as_str()),
        ("a:lt2", "E7E6E6"),
        ("a:accent1", primary.as_str()),
        ("a:accent2", secondary.as_str()),
        ("a:accent3", "A5A5A5"),
        ("a:accent4", "FFC000"),
        ("a:accent5", "5B9BD5"),
        ("a:accent6", "70AD47"),
        ("a:hlink", "0563C1"),
        ("a:folHlink", "954F72"),
    ];
    for (slot, color) in scheme {
        xml.start(slot, &[])?
            .empty("a:srgbClr", &[("val", color)])?
            .end(slot)?;
    }
    xml.end("a:clrScheme")?;

    xml.start("a:fontScheme", &[("name", &profile.template.name)])?;
    for (slot, family) in [("a:majorFont", major), ("a:minorFont", minor)] {
        xml.start(slot, &[])?
            .empty("a:latin", &[("typeface", family)])?
            .empty("a:ea", &[("typeface", "")])?
            .empty("a:cs", &[("typeface", "")])?
            .end(slot)?;
    }
    xml.end("a:fontScheme")?;

    xml.raw(FORMAT_SCHEME)?;
    xml.end("a:themeElements")?;
    xml.end("a:theme")?;
    Ok(xml.finish())
}

pub(crate) fn core_properties(metadata: &DocumentMetadata) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", &[], &metadata.title)?;
    if !metadata.subject.is_empty() {
        xml.text_element("dc:subject", &[], &metadata.subject)?;
    }
    xml.text_element("dc:creator", &[], &metadata.author)?;

    let origin: Vec<&str> = [metadata.creator.as_str(), metadata.producer.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !origin.is_empty() {
        let description = format!("Converted from PDF ({})", origin.join(", "));
        xml.text_element("dc:description", &[], &description)?;
    }

    if let Some(created) = metadata.creation_date.as_deref().and_then(w3c_date) {
        xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    } else if let Some(raw) = &metadata.creation_date {
        log::warn!("Ignoring unrecognized creation date '{}'", raw);
    }

    xml.text_element("cp:revision", &[], "1")?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// Convert a PDF date (`D:YYYYMMDDHHmmSS+HH'mm'`) to W3CDTF.
///
/// Dates that are already W3CDTF pass through. Anything else yields `None`.
fn w3c_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[7] == b'-'
    {
        return Some(raw.to_string());
    }

    let body = raw.strip_prefix("D:").unwrap_or(raw);
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }
    let field =
        |start: usize, default: &'static str| digits.get(start..start + 2).unwrap_or(default);
    let date = format!("{}-{}-{}", &digits[..4], field(4, "01"), field(6, "01"));
    if digits.len() < 10 {
        return Some(date);
    }

    let zone = match body[digits.len()..].chars().next() {
        Some(sign @ ('+' | '-')) => {
            let offset: String = body[digits.len() + 1..]
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            match (offset.get(..2), offset.get(2..4)) {
                (Some(hours), minutes) => format!("{}{}:{}", sign, hours, minutes.unwrap_or("00")),
                (None, _) => "Z".to_string(),
            }
        }
        _ => "Z".to_string(),
    };
    Some(format!(
        "{}T{}:{}:{}{}",
        date,
        field(8, "00"),
        field(10, "00"),
        field(12, "00"),
        zone
    ))
}

pub(crate) fn app_properties(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("Application", &[], env!("CARGO_PKG_NAME"))?;
    xml.text_element("Slides", &[], &slide_count.to_string())?;
    xml.end("Properties")?;
    Ok(xml.finish())
}
