//! Domain types for page text and the slides built from it.

use serde::{Deserialize, Serialize};

/// One decoded run of text with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The decoded text.
    pub text: String,

    /// Horizontal position in page coordinates.
    pub x: f64,

    /// Vertical position in page coordinates. Larger is higher on the page.
    pub y: f64,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// Whether both coordinates are usable for ordering.
    pub fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A reconstructed visual line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalLine {
    /// Fragment texts joined left to right with single spaces.
    pub text: String,

    /// Y position of the first fragment of the line in reading order.
    pub y: f64,

    /// Number of fragments merged into this line.
    pub fragment_count: usize,
}

impl LogicalLine {
    /// Create a line from already-joined text.
    pub fn new(text: impl Into<String>, y: f64) -> Self {
        Self {
            text: text.into(),
            y,
            fragment_count: 1,
        }
    }
}

/// One page's title and body after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDocument {
    /// 1-based page number.
    pub page_number: usize,

    /// First line of the page, or a fallback label. Never empty.
    pub title: String,

    /// Remaining lines joined with newlines. May be empty.
    pub body: String,
}

impl PageDocument {
    /// All of the page's text, title first.
    pub fn raw_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.body)
        }
    }
}

/// The slide archetype that decides which placeholder template applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideRole {
    TitleSlide,
    ContentSlide,
}

impl SlideRole {
    /// The first page opens the deck; every other page is content.
    pub fn for_page_index(page_index: usize) -> Self {
        if page_index == 0 {
            Self::TitleSlide
        } else {
            Self::ContentSlide
        }
    }

    /// Key used in the style profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleSlide => "title_slide",
            Self::ContentSlide => "content_slide",
        }
    }
}

/// Named region of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    Subtitle,
    Content,
    Footer,
}

impl PlaceholderKind {
    /// Key used in the style profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Content => "content",
            Self::Footer => "footer",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical anchoring of text inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Absolute position and size of a placeholder, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fully resolved text styling for a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family name.
    pub family: String,

    /// Font size in points.
    pub size: f64,

    /// Bold weight.
    pub bold: bool,

    /// Six hex digits, no leading `#`.
    pub color: String,

    /// Extra spacing in percent of a single line. `None` leaves the writer's
    /// default in place.
    pub line_spacing: Option<i32>,

    /// Render the text as a bullet list.
    pub bullet: bool,
}

/// Placeholder content: a single block or an ordered bullet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum PlaceholderText {
    Block(String),
    Bullets(Vec<String>),
}

impl PlaceholderText {
    /// Paragraphs in display order.
    pub fn paragraphs(&self) -> Vec<&str> {
        match self {
            Self::Block(text) => text.split('\n').collect(),
            Self::Bullets(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// Hints for the presentation writer. Always passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderHints {
    /// Let the writer shrink text to fit. Always off.
    pub auto_fit: bool,

    /// Wrap text at the box edge.
    pub wrap: bool,

    /// Keep line breaks as paragraph breaks.
    pub break_line: bool,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            auto_fit: false,
            wrap: true,
            break_line: true,
        }
    }
}

/// One positioned, styled text region of a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub geometry: Geometry,
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
    pub text: PlaceholderText,
    pub style: TextStyle,
    pub hints: RenderHints,
}

/// A slide ready to hand to a presentation writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescription {
    /// 1-based number of the source page.
    pub page_number: usize,

    pub role: SlideRole,

    /// Title first, then body (if any), then footer (if enabled).
    pub placeholders: Vec<Placeholder>,
}

impl SlideDescription {
    /// Find a placeholder by kind.
    pub fn placeholder(&self, kind: PlaceholderKind) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.kind == kind)
    }
}

/// Document-level information reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: Option<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            author: "Unknown".to_string(),
            subject: String::new(),
            creator: String::new(),
            producer: String::new(),
            creation_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_for_page_index() {
        assert_eq!(SlideRole::for_page_index(0), SlideRole::TitleSlide);
        assert_eq!(SlideRole::for_page_index(1), SlideRole::ContentSlide);
        assert_eq!(SlideRole::for_page_index(42), SlideRole::ContentSlide);
    }

    #[test]
    fn test_fragment_finite_position() {
        assert!(TextFragment::new("a", 0.0, 1.0).has_finite_position());
        assert!(!TextFragment::new("a", f64::NAN, 1.0).has_finite_position());
        assert!(!TextFragment::new("a", 0.0, f64::INFINITY).has_finite_position());
    }

    #[test]
    fn test_raw_text() {
        let page = PageDocument {
            page_number: 1,
            title: "Title".to_string(),
            body: "Body".to_string(),
        };
        assert_eq!(page.raw_text(), "Title\nBody");

        let page = PageDocument {
            body: String::new(),
            ..page
        };
        assert_eq!(page.raw_text(), "Title");
    }

    #[test]
    fn test_paragraphs() {
        let block = PlaceholderText::Block("one\ntwo".to_string());
        assert_eq!(block.paragraphs(), vec!["one", "two"]);

        let bullets = PlaceholderText::Bullets(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(bullets.paragraphs(), vec!["a", "b"]);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&SlideRole::TitleSlide).unwrap();
        assert_eq!(json, "\"title_slide\"");
    }

    #[test]
    fn test_default_hints() {
        let hints = RenderHints::default();
        assert!(!hints.auto_fit);
        assert!(hints.wrap);
        assert!(hints.break_line);
    }
}
