//! Core of the PDF-to-slides conversion: rebuilds reading-order lines from
//! positioned text fragments, classifies them into title and body, and maps
//! each page onto a styled slide template.

pub mod classify;
pub mod error;
pub mod fallback;
pub mod lines;
pub mod mapper;
pub mod pipeline;
pub mod profile;
pub mod source;
pub mod types;

pub use classify::classify_page;
pub use error::{Error, Result};
pub use fallback::{fallback_page, FallbackKind};
pub use lines::{reconstruct_lines, LineReconstructor, YAxis, DEFAULT_LINE_TOLERANCE};
pub use mapper::map_to_slide;
pub use pipeline::{Conversion, Converter, PageWarning, Progress};
pub use profile::{FontRole, ProfileStore, StyleProfile};
pub use source::{FragmentSource, JsonFragmentSource, PageFragments};
pub use types::{
    DocumentMetadata, Geometry, HorizontalAlign, LogicalLine, PageDocument, Placeholder,
    PlaceholderKind, PlaceholderText, RenderHints, SlideDescription, SlideRole, TextFragment,
    TextStyle, VerticalAlign,
};
