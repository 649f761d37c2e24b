//! Style profile: fonts, colors, slide geometry and branding.
//!
//! A profile is loaded once and treated as immutable. Changing the
//! configuration means building a new profile and swapping it into a
//! [`ProfileStore`] between conversions.

use crate::error::{Error, Result};
use crate::lines::DEFAULT_LINE_TOLERANCE;
use crate::types::{HorizontalAlign, PlaceholderKind, SlideRole, VerticalAlign};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Complete declarative style and layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    #[serde(default)]
    pub template: TemplateInfo,

    #[serde(default)]
    pub design: Design,

    #[serde(default)]
    pub conversion: ConversionSettings,

    #[serde(default)]
    pub branding: Branding,
}

/// Descriptive template information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
}

impl Default for TemplateInfo {
    fn default() -> Self {
        Self {
            name: "Default Template".to_string(),
        }
    }
}

/// Visual design settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    #[serde(default)]
    pub theme: Theme,

    /// Fonts keyed by text role. `title` and `body` are required for mapping.
    #[serde(default)]
    pub fonts: BTreeMap<FontRole, FontSpec>,

    #[serde(default)]
    pub layout: SlideLayout,
}

/// Theme colors as `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#2C5F2D".to_string(),
            secondary_color: "#97BC62".to_string(),
            background_color: "#FFFFFF".to_string(),
        }
    }
}

/// Text roles with their own font settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Title,
    Body,
}

impl FontRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
        }
    }
}

/// Font attributes for one text role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,

    /// Size in points.
    pub size: f64,

    #[serde(default)]
    pub bold: bool,

    /// `#RRGGBB`.
    pub color: String,

    /// Line height multiplier, e.g. `1.4`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

/// Slide dimensions and margins, in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideLayout {
    pub slide_width: f64,
    pub slide_height: f64,
    pub margin: Margin,
}

impl Default for SlideLayout {
    fn default() -> Self {
        Self {
            slide_width: 10.0,
            slide_height: 7.5,
            margin: Margin::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 0.5,
            left: 0.5,
            right: 0.5,
            bottom: 0.5,
        }
    }
}

/// Conversion settings: placeholder templates and line grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Placeholder geometry keyed by slide role, then placeholder name.
    #[serde(default)]
    pub slide_templates: BTreeMap<SlideRole, BTreeMap<PlaceholderKind, PlaceholderGeometry>>,

    /// Vertical tolerance for line reconstruction, in page units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_tolerance: Option<f64>,
}

/// Position, size and alignment of one placeholder, in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    #[serde(default)]
    pub align: HorizontalAlign,

    #[serde(default)]
    pub valign: VerticalAlign,
}

impl PlaceholderGeometry {
    fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        align: HorizontalAlign,
        valign: VerticalAlign,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            align,
            valign,
        }
    }
}

/// Branding elements added to every slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterConfig>,
}

/// Footer text shown on every slide when enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub text: String,

    pub position: Position,

    /// Width in inches. Defaults to the slide width minus the left offset on
    /// both sides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Height in inches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default = "default_footer_font_size")]
    pub font_size: f64,

    #[serde(default = "default_footer_color")]
    pub color: String,
}

fn default_footer_font_size() -> f64 {
    10.0
}

fn default_footer_color() -> String {
    "#000000".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Default for StyleProfile {
    fn default() -> Self {
        use HorizontalAlign::{Center, Left};
        use VerticalAlign::{Middle, Top};

        let mut fonts = BTreeMap::new();
        fonts.insert(
            FontRole::Title,
            FontSpec {
                family: "Arial".to_string(),
                size: 32.0,
                bold: true,
                color: "#2C5F2D".to_string(),
                line_height: None,
            },
        );
        fonts.insert(
            FontRole::Body,
            FontSpec {
                family: "Arial".to_string(),
                size: 18.0,
                bold: false,
                color: "#333333".to_string(),
                line_height: None,
            },
        );

        let mut title_slide = BTreeMap::new();
        title_slide.insert(
            PlaceholderKind::Title,
            PlaceholderGeometry::new(0.5, 2.5, 9.0, 1.5, Center, Middle),
        );
        title_slide.insert(
            PlaceholderKind::Subtitle,
            PlaceholderGeometry::new(0.5, 4.2, 9.0, 0.8, Center, Top),
        );

        let mut content_slide = BTreeMap::new();
        content_slide.insert(
            PlaceholderKind::Title,
            PlaceholderGeometry::new(0.5, 0.5, 9.0, 0.8, Left, Middle),
        );
        content_slide.insert(
            PlaceholderKind::Content,
            PlaceholderGeometry::new(0.5, 1.5, 9.0, 5.5, Left, Top),
        );

        let mut slide_templates = BTreeMap::new();
        slide_templates.insert(SlideRole::TitleSlide, title_slide);
        slide_templates.insert(SlideRole::ContentSlide, content_slide);

        Self {
            template: TemplateInfo::default(),
            design: Design {
                theme: Theme::default(),
                fonts,
                layout: SlideLayout::default(),
            },
            conversion: ConversionSettings {
                slide_templates,
                line_tolerance: None,
            },
            branding: Branding {
                footer: Some(FooterConfig {
                    enabled: true,
                    text: "FABRIC TOKYO".to_string(),
                    position: Position { x: 0.5, y: 7.0 },
                    width: None,
                    height: None,
                    font_size: 10.0,
                    color: "#97BC62".to_string(),
                }),
            },
        }
    }
}

impl StyleProfile {
    /// Parse a profile from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ProfileError(e.to_string()))
    }

    /// Load a profile from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Geometry for a placeholder on a slide role, if configured.
    pub fn geometry(&self, role: SlideRole, kind: PlaceholderKind) -> Option<&PlaceholderGeometry> {
        self.conversion.slide_templates.get(&role)?.get(&kind)
    }

    /// Font settings for a text role, if configured.
    pub fn font(&self, role: FontRole) -> Option<&FontSpec> {
        self.design.fonts.get(&role)
    }

    /// The footer, only when it is enabled.
    pub fn enabled_footer(&self) -> Option<&FooterConfig> {
        self.branding.footer.as_ref().filter(|f| f.enabled)
    }

    /// Vertical tolerance for line reconstruction.
    pub fn line_tolerance(&self) -> f64 {
        self.conversion
            .line_tolerance
            .unwrap_or(DEFAULT_LINE_TOLERANCE)
    }

    /// A copy of this profile with a different line tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f64) -> Self {
        self.conversion.line_tolerance = Some(tolerance);
        self
    }
}

/// Shared holder for the active profile.
///
/// Readers take a snapshot and keep it for a whole conversion, so a
/// replacement never lands mid-conversion.
#[derive(Debug, Default)]
pub struct ProfileStore {
    current: RwLock<Arc<StyleProfile>>,
}

impl ProfileStore {
    pub fn new(profile: StyleProfile) -> Self {
        Self {
            current: RwLock::new(Arc::new(profile)),
        }
    }

    /// The profile in effect right now.
    pub fn snapshot(&self) -> Arc<StyleProfile> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new profile. Conversions already running keep the old one.
    pub fn replace(&self, profile: StyleProfile) -> Arc<StyleProfile> {
        let next = Arc::new(profile);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}
