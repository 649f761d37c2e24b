//! Slide parts: one text-box shape per placeholder.

use crate::parts::group_shape_properties;
use crate::xml::{XmlBuilder, NS_A, NS_P, NS_R};
use crate::{color_or, emu};
use slidecast_core::{
    HorizontalAlign, Placeholder, PlaceholderKind, Result, SlideDescription, TextStyle,
    VerticalAlign,
};

/// Left margin and hanging indent for bullet paragraphs, in EMU.
const BULLET_INDENT: i64 = 285_750;

/// Upper bound for `a:spcPct`, in percent.
const MAX_SPACING_PERCENT: i64 = 13_200;

/// Text-box insets, in EMU.
const INSET_X: &str = "91440";
const INSET_Y: &str = "45720";

/// Generate `slideN.xml`.
pub(crate) fn slide_xml(slide: &SlideDescription) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.start("p:cSld", &[])?.start("p:spTree", &[])?;
    group_shape_properties(&mut xml)?;

    // Shape id 1 is the group itself.
    for (index, placeholder) in slide.placeholders.iter().enumerate() {
        write_shape(&mut xml, placeholder, index + 2)?;
    }

    xml.end("p:spTree")?.end("p:cSld")?;
    xml.raw("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

fn shape_name(kind: PlaceholderKind) -> &'static str {
    match kind {
        PlaceholderKind::Title => "Title",
        PlaceholderKind::Subtitle => "Subtitle",
        PlaceholderKind::Content => "Content",
        PlaceholderKind::Footer => "Footer",
    }
}

fn align_attr(align: HorizontalAlign) -> &'static str {
    match align {
        HorizontalAlign::Left => "l",
        HorizontalAlign::Center => "ctr",
        HorizontalAlign::Right => "r",
        HorizontalAlign::Justify => "just",
    }
}

fn anchor_attr(valign: VerticalAlign) -> &'static str {
    match valign {
        VerticalAlign::Top => "t",
        VerticalAlign::Middle => "ctr",
        VerticalAlign::Bottom => "b",
    }
}

fn write_shape(xml: &mut XmlBuilder, placeholder: &Placeholder, shape_id: usize) -> Result<()> {
    let id = shape_id.to_string();
    let name = format!("{} {}", shape_name(placeholder.kind), shape_id - 1);
    let geometry = &placeholder.geometry;

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", &id), ("name", &name)])?
        .empty("p:cNvSpPr", &[("txBox", "1")])?
        .empty("p:nvPr", &[])?
        .end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?
        .start("a:xfrm", &[])?
        .empty(
            "a:off",
            &[
                ("x", &emu(geometry.x).to_string()),
                ("y", &emu(geometry.y).to_string()),
            ],
        )?
        .empty(
            "a:ext",
            &[
                ("cx", &emu(geometry.width).to_string()),
                ("cy", &emu(geometry.height).to_string()),
            ],
        )?
        .end("a:xfrm")?
        .raw(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#)?
        .end("p:spPr")?;

    let hints = &placeholder.hints;
    xml.start("p:txBody", &[])?;
    xml.start(
        "a:bodyPr",
        &[
            ("wrap", if hints.wrap { "square" } else { "none" }),
            ("lIns", INSET_X),
            ("tIns", INSET_Y),
            ("rIns", INSET_X),
            ("bIns", INSET_Y),
            ("rtlCol", "0"),
            ("anchor", anchor_attr(placeholder.valign)),
        ],
    )?;
    xml.empty(if hints.auto_fit { "a:normAutofit" } else { "a:noAutofit" }, &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    let paragraphs = placeholder.text.paragraphs();
    if hints.break_line {
        for paragraph in paragraphs {
            write_paragraph(xml, placeholder, paragraph)?;
        }
    } else {
        write_paragraph(xml, placeholder, &paragraphs.join(" "))?;
    }

    xml.end("p:txBody")?;
    xml.end("p:sp")?;
    Ok(())
}

fn write_paragraph(xml: &mut XmlBuilder, placeholder: &Placeholder, text: &str) -> Result<()> {
    let style = &placeholder.style;
    let align = align_attr(placeholder.align);

    xml.start("a:p", &[])?;
    if style.bullet {
        let margin = BULLET_INDENT.to_string();
        let indent = (-BULLET_INDENT).to_string();
        xml.start(
            "a:pPr",
            &[("marL", &margin), ("indent", &indent), ("algn", align)],
        )?;
    } else {
        xml.start("a:pPr", &[("algn", align)])?;
    }

    if let Some(spacing) = style.line_spacing {
        let percent = (100 + i64::from(spacing)).clamp(0, MAX_SPACING_PERCENT) * 1000;
        let percent = percent.to_string();
        xml.start("a:lnSpc", &[])?
            .empty("a:spcPct", &[("val", &percent)])?
            .end("a:lnSpc")?;
    }

    if style.bullet {
        xml.empty("a:buFont", &[("typeface", "Arial")])?
            .empty("a:buChar", &[("char", "\u{2022}")])?;
    } else {
        xml.empty("a:buNone", &[])?;
    }
    xml.end("a:pPr")?;

    if text.is_empty() {
        write_run_properties(xml, "a:endParaRPr", style)?;
    } else {
        xml.start("a:r", &[])?;
        write_run_properties(xml, "a:rPr", style)?;
        xml.text_element("a:t", &[], text)?;
        xml.end("a:r")?;
    }

    xml.end("a:p")?;
    Ok(())
}

fn write_run_properties(xml: &mut XmlBuilder, element: &str, style: &TextStyle) -> Result<()> {
    let size = ((style.size * 100.0).round() as i64).to_string();
    let color = color_or(&style.color, "000000");

    xml.start(
        element,
        &[
            ("lang", "en-US"),
            ("sz", &size),
            ("b", if style.bold { "1" } else { "0" }),
            ("dirty", "0"),
        ],
    )?;
    xml.start("a:solidFill", &[])?
        .empty("a:srgbClr", &[("val", &color)])?
        .end("a:solidFill")?;
    if !style.family.is_empty() {
        for slot in ["a:latin", "a:ea", "a:cs"] {
            xml.empty(slot, &[("typeface", &style.family)])?;
        }
    }
    xml.end(element)?;
    Ok(())
}
