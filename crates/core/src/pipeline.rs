//! Document conversion: runs every page through reconstruction,
//! classification and slide mapping.

use crate::classify::classify_page;
use crate::error::{Error, Result};
use crate::fallback::{fallback_page, FallbackKind};
use crate::lines::LineReconstructor;
use crate::mapper::map_to_slide;
use crate::profile::{ProfileStore, StyleProfile};
use crate::source::FragmentSource;
use crate::types::{DocumentMetadata, PageDocument, SlideDescription};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress at which page extraction starts.
pub const PAGES_START_PERCENT: f64 = 20.0;

/// Share of the overall progress taken by page extraction.
pub const PAGES_SPAN_PERCENT: f64 = 60.0;

/// Progress reported while the presentation file is generated.
pub const GENERATE_PERCENT: u8 = 85;

/// A progress update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub message: String,

    /// 0 to 100.
    pub percent: u8,
}

impl Progress {
    pub fn new(message: impl Into<String>, percent: u8) -> Self {
        Self {
            message: message.into(),
            percent: percent.min(100),
        }
    }

    /// Progress after page `current` of `total` has been processed.
    pub fn page(current: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            1.0
        } else {
            current as f64 / total as f64
        };
        let percent = (PAGES_START_PERCENT + fraction * PAGES_SPAN_PERCENT).round() as u8;
        Self::new(format!("Processing page {}/{}", current, total), percent)
    }
}

/// Something worth reporting that did not stop the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageWarning {
    /// The page produced no text lines.
    EmptyPage { page: usize },

    /// Some fragments on the page were malformed and dropped.
    SkippedFragments { page: usize, count: usize },

    /// The page could not be decoded and was replaced by a placeholder.
    DecodeFailed { page: usize, reason: String },
}

/// Result of converting a whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    pub metadata: DocumentMetadata,

    /// Classified pages in document order.
    pub pages: Vec<PageDocument>,

    /// One slide per page, in document order.
    pub slides: Vec<SlideDescription>,

    pub warnings: Vec<PageWarning>,
}

/// Converts documents using one fixed style profile.
#[derive(Debug, Clone)]
pub struct Converter {
    profile: Arc<StyleProfile>,
}

impl Converter {
    pub fn new(profile: StyleProfile) -> Self {
        Self {
            profile: Arc::new(profile),
        }
    }

    /// Use whatever profile the store holds right now.
    pub fn from_store(store: &ProfileStore) -> Self {
        Self {
            profile: store.snapshot(),
        }
    }

    pub fn profile(&self) -> &StyleProfile {
        &self.profile
    }

    fn reconstructor(&self) -> LineReconstructor {
        LineReconstructor::new().with_tolerance(self.profile.line_tolerance())
    }

    /// Convert every page in order, reporting progress after each one.
    ///
    /// Undecodable pages become placeholder slides. A missing profile entry
    /// aborts the whole conversion.
    pub fn convert<S, F>(&self, source: &S, mut on_progress: F) -> Result<Conversion>
    where
        S: FragmentSource + ?Sized,
        F: FnMut(&Progress),
    {
        let total = source.page_count();
        let reconstructor = self.reconstructor();
        log::info!("Converting {} pages", total);
        on_progress(&Progress::new("Processing pages", PAGES_START_PERCENT as u8));

        let mut pages = Vec::with_capacity(total);
        let mut slides = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        for index in 0..total {
            let outcome = process_page(source, &reconstructor, &self.profile, index)?;
            pages.push(outcome.page);
            slides.push(outcome.slide);
            warnings.extend(outcome.warnings);
            on_progress(&Progress::page(index + 1, total));
        }

        Ok(Conversion {
            metadata: source.metadata(),
            pages,
            slides,
            warnings,
        })
    }

    /// Convert pages concurrently. Output order matches page order.
    pub fn convert_parallel<S>(&self, source: &S) -> Result<Conversion>
    where
        S: FragmentSource + Sync + ?Sized,
    {
        let total = source.page_count();
        let reconstructor = self.reconstructor();
        let profile: &StyleProfile = &self.profile;
        log::info!("Converting {} pages in parallel", total);

        let outcomes = (0..total)
            .into_par_iter()
            .map(|index| process_page(source, &reconstructor, profile, index))
            .collect::<Result<Vec<_>>>()?;

        let mut conversion = Conversion {
            metadata: source.metadata(),
            pages: Vec::with_capacity(total),
            slides: Vec::with_capacity(total),
            warnings: Vec::new(),
        };
        for outcome in outcomes {
            conversion.pages.push(outcome.page);
            conversion.slides.push(outcome.slide);
            conversion.warnings.extend(outcome.warnings);
        }

        Ok(conversion)
    }
}

struct PageOutcome {
    page: PageDocument,
    slide: SlideDescription,
    warnings: Vec<PageWarning>,
}

fn process_page<S>(
    source: &S,
    reconstructor: &LineReconstructor,
    profile: &StyleProfile,
    index: usize,
) -> Result<PageOutcome>
where
    S: FragmentSource + ?Sized,
{
    let page_number = index + 1;
    let (page, warnings) = assemble_page(source, reconstructor, page_number);
    let slide = map_to_slide(&page, index, profile)?;
    Ok(PageOutcome {
        page,
        slide,
        warnings,
    })
}

/// Decode, reconstruct and classify one page. Never fails: problems turn
/// into warnings and fallback content.
fn assemble_page<S>(
    source: &S,
    reconstructor: &LineReconstructor,
    page_number: usize,
) -> (PageDocument, Vec<PageWarning>)
where
    S: FragmentSource + ?Sized,
{
    let mut warnings = Vec::new();

    let decoded = match source.page(page_number) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Page {} could not be decoded: {}", page_number, e);
            let reason = match e {
                Error::PageDecodeError { reason, .. } => reason,
                other => other.to_string(),
            };
            warnings.push(PageWarning::DecodeFailed {
                page: page_number,
                reason,
            });
            return (fallback_page(FallbackKind::DecodeFailure, page_number), warnings);
        }
    };

    if decoded.skipped > 0 {
        warnings.push(PageWarning::SkippedFragments {
            page: page_number,
            count: decoded.skipped,
        });
    }

    let lines = reconstructor.reconstruct(&decoded.fragments);
    log::debug!(
        "Page {}: {} fragments, {} lines",
        page_number,
        decoded.fragments.len(),
        lines.len()
    );

    if lines.is_empty() {
        log::warn!("Page {} has no extractable text", page_number);
        warnings.push(PageWarning::EmptyPage { page: page_number });
    }

    (classify_page(&lines, page_number), warnings)
}
