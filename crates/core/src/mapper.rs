//! Slide mapping: places a classified page into its slide template.

use crate::error::{Error, Result};
use crate::profile::{FontRole, FontSpec, StyleProfile};
use crate::types::{
    Geometry, HorizontalAlign, PageDocument, Placeholder, PlaceholderKind, PlaceholderText,
    RenderHints, SlideDescription, SlideRole, TextStyle, VerticalAlign,
};
use regex::Regex;
use std::sync::LazyLock;

/// A line that starts with a bullet marker followed by whitespace.
static BULLET_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[•\-*]\s").unwrap());

/// A single leading bullet marker and the whitespace after it.
static BULLET_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*]\s*").unwrap());

/// Default footer box height, in inches.
const FOOTER_HEIGHT: f64 = 0.4;

/// Largest extra spacing in percent; 13200% is the OOXML `spcPct` ceiling.
pub const MAX_LINE_SPACING: i32 = 13_100;

/// Map a page onto a slide.
///
/// `page_index` is the 0-based position in the deck; index 0 becomes the
/// title slide. Fails only when the profile lacks a template or font entry
/// that this page needs.
pub fn map_to_slide(
    page: &PageDocument,
    page_index: usize,
    profile: &StyleProfile,
) -> Result<SlideDescription> {
    let role = SlideRole::for_page_index(page_index);
    let mut placeholders = Vec::with_capacity(3);

    let title_font = require_font(profile, FontRole::Title, page.page_number)?;
    placeholders.push(build_placeholder(
        profile,
        role,
        PlaceholderKind::Title,
        PlaceholderText::Block(page.title.clone()),
        resolve_style(title_font),
        page.page_number,
    )?);

    if !page.body.is_empty() {
        let kind = match role {
            SlideRole::TitleSlide => PlaceholderKind::Subtitle,
            SlideRole::ContentSlide => PlaceholderKind::Content,
        };
        let body_font = require_font(profile, FontRole::Body, page.page_number)?;
        let mut style = resolve_style(body_font);

        let text = if has_bullet_points(&page.body) {
            style.bullet = true;
            PlaceholderText::Bullets(bullet_items(&page.body))
        } else {
            PlaceholderText::Block(page.body.clone())
        };

        placeholders.push(build_placeholder(
            profile,
            role,
            kind,
            text,
            style,
            page.page_number,
        )?);
    }

    if let Some(footer) = footer_placeholder(profile) {
        placeholders.push(footer);
    }

    log::debug!(
        "Mapped page {} to {} with {} placeholders",
        page.page_number,
        role.as_str(),
        placeholders.len()
    );

    Ok(SlideDescription {
        page_number: page.page_number,
        role,
        placeholders,
    })
}

/// Whether any physical line of `text` starts with a bullet marker.
pub fn has_bullet_points(text: &str) -> bool {
    BULLET_LINE_REGEX.is_match(text)
}

/// Split a bulleted body into items with their markers removed.
pub fn bullet_items(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| BULLET_PREFIX_REGEX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strip the leading `#` from a `#RRGGBB` color.
pub fn normalize_color(color: &str) -> String {
    let color = color.trim();
    color.strip_prefix('#').unwrap_or(color).to_string()
}

/// Turn a line height multiplier into extra spacing in percent.
///
/// `1.4` becomes `40`. `None` means the writer keeps its default spacing,
/// which is also what a zero or negative height gets. The result is capped at
/// the largest spacing a presentation can hold.
pub fn line_spacing(line_height: Option<f64>) -> Option<i32> {
    line_height
        .filter(|h| h.is_finite() && *h > 0.0)
        .map(|h| ((h - 1.0) * 100.0).round().clamp(-100.0, MAX_LINE_SPACING as f64) as i32)
}

fn resolve_style(font: &FontSpec) -> TextStyle {
    TextStyle {
        family: font.family.clone(),
        size: font.size,
        bold: font.bold,
        color: normalize_color(&font.color),
        line_spacing: line_spacing(font.line_height),
        bullet: false,
    }
}

fn require_font(profile: &StyleProfile, role: FontRole, page: usize) -> Result<&FontSpec> {
    profile.font(role).ok_or_else(|| Error::ConfigurationError {
        page,
        entry: format!("design.fonts.{}", role.as_str()),
    })
}

fn build_placeholder(
    profile: &StyleProfile,
    role: SlideRole,
    kind: PlaceholderKind,
    text: PlaceholderText,
    style: TextStyle,
    page: usize,
) -> Result<Placeholder> {
    let template = profile
        .geometry(role, kind)
        .ok_or_else(|| Error::ConfigurationError {
            page,
            entry: format!(
                "conversion.slide_templates.{}.{}",
                role.as_str(),
                kind.as_str()
            ),
        })?;

    Ok(Placeholder {
        kind,
        geometry: Geometry {
            x: template.x,
            y: template.y,
            width: template.width,
            height: template.height,
        },
        align: template.align,
        valign: template.valign,
        text,
        style,
        hints: RenderHints::default(),
    })
}

fn footer_placeholder(profile: &StyleProfile) -> Option<Placeholder> {
    let footer = profile.enabled_footer()?;
    let layout = &profile.design.layout;

    let width = footer
        .width
        .unwrap_or_else(|| (layout.slide_width - 2.0 * footer.position.x).max(0.0));
    let height = footer.height.unwrap_or(FOOTER_HEIGHT);
    let family = profile
        .font(FontRole::Body)
        .map(|f| f.family.clone())
        .unwrap_or_default();

    Some(Placeholder {
        kind: PlaceholderKind::Footer,
        geometry: Geometry {
            x: footer.position.x,
            y: footer.position.y,
            width,
            height,
        },
        align: HorizontalAlign::Left,
        valign: VerticalAlign::Top,
        text: PlaceholderText::Block(footer.text.clone()),
        style: TextStyle {
            family,
            size: footer.font_size,
            bold: false,
            color: normalize_color(&footer.color),
            line_spacing: None,
            bullet: false,
        },
        hints: RenderHints::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, title: &str, body: &str) -> PageDocument {
        PageDocument {
            page_number: number,
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_role_by_index() {
        let profile = StyleProfile::default();
        let p = page(1, "Deck", "");

        assert_eq!(map_to_slide(&p, 0, &profile).unwrap().role, SlideRole::TitleSlide);
        assert_eq!(map_to_slide(&p, 1, &profile).unwrap().role, SlideRole::ContentSlide);
        assert_eq!(map_to_slide(&p, 9, &profile).unwrap().role, SlideRole::ContentSlide);
    }

    #[test]
    fn test_title_slide_uses_subtitle() {
        let profile = StyleProfile::default();
        let slide = map_to_slide(&page(1, "Deck", "By someone"), 0, &profile).unwrap();

        assert!(slide.placeholder(PlaceholderKind::Subtitle).is_some());
        assert!(slide.placeholder(PlaceholderKind::Content).is_none());

        let title = slide.placeholder(PlaceholderKind::Title).unwrap();
        assert_eq!(title.text, PlaceholderText::Block("Deck".to_string()));
        assert_eq!(title.align, HorizontalAlign::Center);
        assert_eq!(title.geometry.y, 2.5);
        assert_eq!(title.style.color, "2C5F2D");
        assert!(title.style.bold);
    }

    #[test]
    fn test_content_slide_uses_content() {
        let profile = StyleProfile::default();
        let slide = map_to_slide(&page(2, "Agenda", "Plain text"), 1, &profile).unwrap();

        let body = slide.placeholder(PlaceholderKind::Content).unwrap();
        assert_eq!(body.text, PlaceholderText::Block("Plain text".to_string()));
        assert!(!body.style.bullet);
        assert_eq!(body.style.size, 18.0);
        assert_eq!(body.style.color, "333333");
    }

    #[test]
    fn test_empty_body_has_no_body_placeholder() {
        let profile = StyleProfile::default();
        let slide = map_to_slide(&page(2, "Only title", ""), 1, &profile).unwrap();

        let kinds: Vec<_> = slide.placeholders.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PlaceholderKind::Title, PlaceholderKind::Footer]);
    }

    #[test]
    fn test_bullets_detected_and_stripped() {
        let profile = StyleProfile::default();
        let slide =
            map_to_slide(&page(2, "List", "• alpha\n- beta\n* gamma"), 1, &profile).unwrap();

        let body = slide.placeholder(PlaceholderKind::Content).unwrap();
        assert!(body.style.bullet);
        assert_eq!(
            body.text,
            PlaceholderText::Bullets(vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string()
            ])
        );
    }

    #[test]
    fn test_bullet_detection_is_per_line() {
        assert!(has_bullet_points("Intro\n- point"));
        assert!(!has_bullet_points("-no space"));
        assert!(!has_bullet_points("mid - dash"));
        assert!(!has_bullet_points("Plain\ntext"));
    }

    #[test]
    fn test_bullet_items_keep_unmarked_lines() {
        assert_eq!(
            bullet_items("Intro\n• one\n\n  \n-   two  "),
            vec!["Intro", "one", "two"]
        );
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("#2C5F2D"), "2C5F2D");
        assert_eq!(normalize_color("2C5F2D"), "2C5F2D");
    }

    #[test]
    fn test_line_spacing() {
        assert_eq!(line_spacing(Some(1.4)), Some(40));
        assert_eq!(line_spacing(Some(1.6)), Some(60));
        assert_eq!(line_spacing(Some(1.0)), Some(0));
        assert_eq!(line_spacing(None), None);
    }

    #[test]
    fn test_line_spacing_unset_heights() {
        assert_eq!(line_spacing(Some(0.0)), None);
        assert_eq!(line_spacing(Some(-1.5)), None);
        assert_eq!(line_spacing(Some(f64::NAN)), None);
        assert_eq!(line_spacing(Some(0.5)), Some(-50));
    }

    #[test]
    fn test_line_spacing_capped() {
        assert_eq!(line_spacing(Some(30000.0)), Some(MAX_LINE_SPACING));
        assert_eq!(line_spacing(Some(f64::MAX)), Some(MAX_LINE_SPACING));
        assert_eq!(line_spacing(Some(132.0)), Some(MAX_LINE_SPACING));
        assert_eq!(line_spacing(Some(131.0)), Some(13_000));
    }

    #[test]
    fn test_footer_from_profile() {
        let profile = StyleProfile::default();
        let slide = map_to_slide(&page(3, "T", ""), 2, &profile).unwrap();

        let footer = slide.placeholder(PlaceholderKind::Footer).unwrap();
        assert_eq!(footer.text, PlaceholderText::Block("FABRIC TOKYO".to_string()));
        assert_eq!(footer.geometry.x, 0.5);
        assert_eq!(footer.geometry.y, 7.0);
        assert_eq!(footer.geometry.width, 9.0);
        assert_eq!(footer.style.color, "97BC62");
        assert_eq!(footer.style.size, 10.0);
    }

    #[test]
    fn test_disabled_footer_omitted() {
        let mut profile = StyleProfile::default();
        profile.branding.footer = None;
        let slide = map_to_slide(&page(3, "T", ""), 2, &profile).unwrap();
        assert!(slide.placeholder(PlaceholderKind::Footer).is_none());
    }

    #[test]
    fn test_render_hints_always_set() {
        let profile = StyleProfile::default();
        let slide = map_to_slide(&page(1, "T", "B"), 0, &profile).unwrap();
        for placeholder in &slide.placeholders {
            assert_eq!(placeholder.hints, RenderHints::default());
        }
    }

    #[test]
    fn test_line_height_resolved() {
        let mut profile = StyleProfile::default();
        if let Some(font) = profile.design.fonts.get_mut(&FontRole::Title) {
            font.line_height = Some(1.4);
        }
        let slide = map_to_slide(&page(1, "T", "B"), 0, &profile).unwrap();

        let title = slide.placeholder(PlaceholderKind::Title).unwrap();
        assert_eq!(title.style.line_spacing, Some(40));
        let subtitle = slide.placeholder(PlaceholderKind::Subtitle).unwrap();
        assert_eq!(subtitle.style.line_spacing, None);
    }

    #[test]
    fn test_missing_template_is_configuration_error() {
        let mut profile = StyleProfile::default();
        profile
            .conversion
            .slide_templates
            .remove(&SlideRole::TitleSlide);

        let err = map_to_slide(&page(1, "T", ""), 0, &profile).unwrap_err();
        match err {
            Error::ConfigurationError { page, entry } => {
                assert_eq!(page, 1);
                assert_eq!(entry, "conversion.slide_templates.title_slide.title");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Content slides are unaffected.
        assert!(map_to_slide(&page(2, "T", "B"), 1, &profile).is_ok());
    }

    #[test]
    fn test_missing_body_geometry_only_fails_with_body() {
        let mut profile = StyleProfile::default();
        if let Some(content) = profile
            .conversion
            .slide_templates
            .get_mut(&SlideRole::ContentSlide)
        {
            content.remove(&PlaceholderKind::Content);
        }

        assert!(map_to_slide(&page(2, "T", ""), 1, &profile).is_ok());
        let err = map_to_slide(&page(2, "T", "B"), 1, &profile).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError { page: 2, .. }));
    }

    #[test]
    fn test_missing_font_is_configuration_error() {
        let mut profile = StyleProfile::default();
        profile.design.fonts.remove(&FontRole::Body);

        let err = map_to_slide(&page(4, "T", "B"), 3, &profile).unwrap_err();
        match err {
            Error::ConfigurationError { entry, .. } => assert_eq!(entry, "design.fonts.body"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
