//! Fallback page content, keyed by the reason a page has no usable text.
//!
//! Every substitute title and body in the crate comes from this table.

use crate::types::PageDocument;

/// Why a page needs fallback content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// The first line is missing or blank.
    MissingTitle,
    /// The page decoded but produced no lines.
    EmptyPage,
    /// The page could not be decoded at all.
    DecodeFailure,
}

impl FallbackKind {
    /// Title to use for the given page.
    pub fn title(self, page_number: usize) -> String {
        format!("Page {}", page_number)
    }

    /// Body to use for the given page.
    pub fn body(self, page_number: usize) -> String {
        match self {
            Self::MissingTitle | Self::EmptyPage => String::new(),
            Self::DecodeFailure => format!("[Page {} could not be read]", page_number),
        }
    }
}

/// Build a complete placeholder page.
pub fn fallback_page(kind: FallbackKind, page_number: usize) -> PageDocument {
    PageDocument {
        page_number,
        title: kind.title(page_number),
        body: kind.body(page_number),
    }
}
