//! WASM-compatible wrapper for slide conversion.
//!
//! Exposes line reconstruction and document conversion to JavaScript so the
//! browser front end can hand over pdf.js text content directly.

use serde::{Deserialize, Serialize};
use slidecast_core::{
    Conversion, Converter, JsonFragmentSource, LineReconstructor, LogicalLine, PageDocument,
    PageWarning, SlideDescription, StyleProfile,
};
use slidecast_core::source::decode_fragment;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of converting a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Document title reported by the decoder.
    pub title: String,
    /// Classified pages in order.
    pub pages: Vec<PageDocument>,
    /// One slide per page.
    pub slides: Vec<SlideDescription>,
    /// Non-fatal problems found along the way.
    pub warnings: Vec<PageWarning>,
}

impl From<Conversion> for ConversionResult {
    fn from(conversion: Conversion) -> Self {
        Self {
            title: conversion.metadata.title,
            pages: conversion.pages,
            slides: conversion.slides,
            warnings: conversion.warnings,
        }
    }
}

/// Lines of one page plus the number of fragments that could not be read.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinesResult {
    pub lines: Vec<LogicalLine>,
    pub skipped: usize,
}

/// Group one page's fragments into reading-order lines.
///
/// # Arguments
/// * `fragments` - Array of `{ text, x, y }` objects or pdf.js text items
/// * `tolerance` - Optional vertical tolerance (default: 5)
///
/// Items that cannot be read are left out and counted in `skipped`.
#[wasm_bindgen]
pub fn reconstruct_lines(fragments: JsValue, tolerance: Option<f64>) -> Result<JsValue, JsValue> {
    let items: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(fragments)
        .map_err(|e| JsValue::from_str(&format!("Invalid fragments array: {}", e)))?;

    to_js(&reconstruct_lines_impl(&items, tolerance))
}

fn reconstruct_lines_impl(items: &[serde_json::Value], tolerance: Option<f64>) -> LinesResult {
    let mut fragments = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match decode_fragment(item) {
            Ok(fragment) => fragments.push(fragment),
            Err(_) => skipped += 1,
        }
    }

    let mut reconstructor = LineReconstructor::new();
    if let Some(tolerance) = tolerance {
        reconstructor = reconstructor.with_tolerance(tolerance);
    }
    LinesResult {
        lines: reconstructor.reconstruct(&fragments),
        skipped,
    }
}

/// Convert a whole decoder dump into slide descriptions.
///
/// # Arguments
/// * `document` - Array of pages, or `{ metadata, y_axis, pages }`
/// * `profile` - Optional style profile (default: built-in profile)
#[wasm_bindgen]
pub fn convert_document(document: JsValue, profile: JsValue) -> Result<JsValue, JsValue> {
    let document: serde_json::Value = serde_wasm_bindgen::from_value(document)
        .map_err(|e| JsValue::from_str(&format!("Invalid document: {}", e)))?;

    let profile = if profile.is_undefined() || profile.is_null() {
        StyleProfile::default()
    } else {
        // Go through serde_json so role-keyed maps deserialize from plain objects.
        let value: serde_json::Value = serde_wasm_bindgen::from_value(profile)
            .map_err(|e| JsValue::from_str(&format!("Invalid profile: {}", e)))?;
        serde_json::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid profile: {}", e)))?
    };

    let result = convert_document_impl(document, profile).map_err(|e| JsValue::from_str(&e))?;

    to_js(&result)
}

fn convert_document_impl(
    document: serde_json::Value,
    profile: StyleProfile,
) -> Result<ConversionResult, String> {
    let source = JsonFragmentSource::from_value(document).map_err(|e| e.to_string())?;
    let conversion = Converter::new(profile)
        .convert(&source, |_| {})
        .map_err(|e| e.to_string())?;
    Ok(conversion.into())
}

/// The built-in style profile, as a starting point for customization.
#[wasm_bindgen]
pub fn default_profile() -> Result<JsValue, JsValue> {
    to_js(&StyleProfile::default())
}

/// Serialize maps as plain objects rather than `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reconstruct_lines_impl() {
        let items = vec![
            json!({ "text": "World", "x": 5, "y": 100 }),
            json!({ "text": "Hello", "x": 0, "y": 100 }),
            json!({ "text": "Below", "x": 0, "y": 50 }),
        ];

        let result = reconstruct_lines_impl(&items, None);
        let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello World", "Below"]);
        assert_eq!(result.skipped, 0);

        let result = reconstruct_lines_impl(&items, Some(60.0));
        assert_eq!(result.lines.len(), 1);
    }

    #[test]
    fn test_reconstruct_lines_skips_unreadable_items() {
        let items = vec![
            json!({ "text": "good", "x": 0, "y": 10 }),
            json!({ "text": "no y", "x": 0 }),
            json!({ "text": "bad x", "x": "left", "y": 10 }),
            json!("plain string"),
            json!({ "str": "pdfjs", "transform": [1, 0, 0, 1, 40, 10] }),
        ];

        let result = reconstruct_lines_impl(&items, None);
        let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["good pdfjs"]);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn test_convert_document_impl() {
        let document = json!({
            "metadata": { "title": "Deck" },
            "pages": [
                [{ "str": "Welcome", "transform": [1, 0, 0, 1, 10, 500] }],
                [{ "text": "Agenda", "x": 0, "y": 700 }, { "text": "- item", "x": 0, "y": 600 }]
            ]
        });

        let result = convert_document_impl(document, StyleProfile::default()).unwrap();
        assert_eq!(result.title, "Deck");
        assert_eq!(result.slides.len(), 2);
        assert_eq!(result.pages[0].title, "Welcome");
        assert_eq!(result.pages[1].body, "- item");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_convert_document_reports_bad_profile() {
        let mut profile = StyleProfile::default();
        profile.design.fonts.clear();

        let err = convert_document_impl(json!([[]]), profile).unwrap_err();
        assert!(err.contains("design.fonts.title"));
    }
}
