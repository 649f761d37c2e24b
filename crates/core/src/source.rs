//! Fragment sources: where per-page text fragments come from.
//!
//! The PDF decoder itself lives outside this crate. [`JsonFragmentSource`]
//! reads its output from a JSON dump, accepting both plain
//! `{ "text", "x", "y" }` fragments and pdf.js text items
//! (`{ "str", "transform": [a, b, c, d, e, f] }`).

use crate::error::{Error, Result};
use crate::lines::YAxis;
use crate::types::{DocumentMetadata, TextFragment};
use serde_json::Value;
use std::path::Path;

/// Fragments decoded from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFragments {
    pub fragments: Vec<TextFragment>,

    /// Malformed fragments dropped while decoding.
    pub skipped: usize,
}

/// Supplies text fragments page by page.
pub trait FragmentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Decode one page. `page_number` is 1-based.
    fn page(&self, page_number: usize) -> Result<PageFragments>;

    /// Document information, if the decoder reported any.
    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata::default()
    }
}

impl FragmentSource for Vec<Vec<TextFragment>> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page(&self, page_number: usize) -> Result<PageFragments> {
        let fragments = page_number
            .checked_sub(1)
            .and_then(|i| self.get(i))
            .ok_or_else(|| Error::PageDecodeError {
                page: page_number,
                reason: "page out of range".to_string(),
            })?;

        Ok(PageFragments {
            fragments: fragments.clone(),
            skipped: 0,
        })
    }
}

/// Decoder output loaded from JSON.
///
/// Accepts either a bare array of pages or an object with `pages`, plus
/// optional `metadata` and `y_axis` (`"up"` or `"down"`).
#[derive(Debug, Clone)]
pub struct JsonFragmentSource {
    pages: Vec<Value>,
    metadata: DocumentMetadata,
    y_axis: YAxis,
}

impl JsonFragmentSource {
    /// Parse a decoder dump.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a decoder dump from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Build from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(pages) => Ok(Self {
                pages,
                metadata: DocumentMetadata::default(),
                y_axis: YAxis::Up,
            }),
            Value::Object(mut map) => {
                let pages = match map.remove("pages") {
                    Some(Value::Array(pages)) => pages,
                    Some(_) => {
                        return Err(Error::InvalidDocument("'pages' is not an array".to_string()))
                    }
                    None => return Err(Error::InvalidDocument("missing 'pages'".to_string())),
                };

                let metadata = match map.remove("metadata") {
                    Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
                        log::warn!("Ignoring unreadable metadata: {}", e);
                        DocumentMetadata::default()
                    }),
                    None => DocumentMetadata::default(),
                };

                let y_axis = match map.remove("y_axis") {
                    Some(v) => serde_json::from_value(v)
                        .map_err(|e| Error::InvalidDocument(format!("bad 'y_axis': {}", e)))?,
                    None => YAxis::Up,
                };

                Ok(Self {
                    pages,
                    metadata,
                    y_axis,
                })
            }
            _ => Err(Error::InvalidDocument(
                "expected an array of pages or an object".to_string(),
            )),
        }
    }

    pub fn y_axis(&self) -> YAxis {
        self.y_axis
    }
}

impl FragmentSource for JsonFragmentSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, page_number: usize) -> Result<PageFragments> {
        let page = page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or_else(|| Error::PageDecodeError {
                page: page_number,
                reason: "page out of range".to_string(),
            })?;

        let items = page.as_array().ok_or_else(|| Error::PageDecodeError {
            page: page_number,
            reason: "page is not an array of fragments".to_string(),
        })?;

        let mut decoded = PageFragments::default();
        for (index, item) in items.iter().enumerate() {
            match decode_fragment(item) {
                Ok(mut fragment) => {
                    fragment.y = self.y_axis.normalize(fragment.y);
                    decoded.fragments.push(fragment);
                }
                Err(e) => {
                    log::warn!("Page {}, fragment {}: {}", page_number, index, e);
                    decoded.skipped += 1;
                }
            }
        }

        Ok(decoded)
    }

    fn metadata(&self) -> DocumentMetadata {
        self.metadata.clone()
    }
}

/// Decode one fragment from either supported shape.
pub fn decode_fragment(value: &Value) -> Result<TextFragment> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::DecodeFragmentError("not an object".to_string()))?;

    let text = obj
        .get("text")
        .or_else(|| obj.get("str"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::DecodeFragmentError("missing text".to_string()))?;

    let (x, y) = match (obj.get("x"), obj.get("y")) {
        (Some(x), Some(y)) => (number(x, "x")?, number(y, "y")?),
        _ => {
            let transform = obj
                .get("transform")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::DecodeFragmentError("missing position".to_string()))?;
            if transform.len() < 6 {
                return Err(Error::DecodeFragmentError(format!(
                    "transform has {} entries, expected 6",
                    transform.len()
                )));
            }
            (number(&transform[4], "transform[4]")?, number(&transform[5], "transform[5]")?)
        }
    };

    Ok(TextFragment::new(text, x, y))
}

fn number(value: &Value, field: &str) -> Result<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::DecodeFragmentError(format!("'{}' is not a number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_plain_fragment() {
        let fragment = decode_fragment(&json!({ "text": "Hello", "x": 1.5, "y": 700 })).unwrap();
        assert_eq!(fragment, TextFragment::new("Hello", 1.5, 700.0));
    }

    #[test]
    fn test_decode_pdfjs_item() {
        let item = json!({ "str": "World", "transform": [12, 0, 0, 12, 72, 640], "width": 30 });
        let fragment = decode_fragment(&item).unwrap();
        assert_eq!(fragment, TextFragment::new("World", 72.0, 640.0));
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_fragment(&json!("text")).is_err());
        assert!(decode_fragment(&json!({ "x": 1, "y": 2 })).is_err());
        assert!(decode_fragment(&json!({ "text": "a", "x": "1", "y": 2 })).is_err());
        assert!(decode_fragment(&json!({ "str": "a", "transform": [1, 0, 0, 1] })).is_err());
        assert!(matches!(
            decode_fragment(&json!({ "text": "a" })),
            Err(Error::DecodeFragmentError(_))
        ));
    }

    #[test]
    fn test_bad_fragments_skipped() {
        let source = JsonFragmentSource::from_value(json!([[
            { "text": "ok", "x": 0, "y": 10 },
            { "text": "broken" },
            42,
            { "str": "also ok", "transform": [1, 0, 0, 1, 5, 10] }
        ]]))
        .unwrap();

        let page = source.page(1).unwrap();
        assert_eq!(page.fragments.len(), 2);
        assert_eq!(page.skipped, 2);
    }

    #[test]
    fn test_page_not_array_is_page_error() {
        let source = JsonFragmentSource::from_value(json!([[], { "oops": true }])).unwrap();
        assert_eq!(source.page_count(), 2);
        assert!(source.page(1).is_ok());
        assert!(matches!(
            source.page(2),
            Err(Error::PageDecodeError { page: 2, .. })
        ));
        assert!(source.page(3).is_err());
        assert!(source.page(0).is_err());
    }

    #[test]
    fn test_object_form_with_metadata_and_axis() {
        let source = JsonFragmentSource::from_value(json!({
            "metadata": { "title": "Quarterly", "author": "Finance" },
            "y_axis": "down",
            "pages": [[{ "text": "top", "x": 0, "y": 10 }]]
        }))
        .unwrap();

        let metadata = source.metadata();
        assert_eq!(metadata.title, "Quarterly");
        assert_eq!(metadata.author, "Finance");
        assert_eq!(metadata.subject, "");
        assert_eq!(source.y_axis(), YAxis::Down);
        assert_eq!(source.page(1).unwrap().fragments[0].y, -10.0);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            JsonFragmentSource::from_value(json!({ "metadata": {} })),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            JsonFragmentSource::from_value(json!("pages")),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            JsonFragmentSource::from_json_str("[["),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn test_vec_source() {
        let source = vec![vec![TextFragment::new("a", 0.0, 0.0)]];
        assert_eq!(source.page_count(), 1);
        assert_eq!(source.page(1).unwrap().fragments.len(), 1);
        assert!(source.page(2).is_err());
    }
}
