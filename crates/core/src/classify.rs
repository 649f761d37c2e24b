//! Page classification: first line is the title, the rest is the body.

use crate::fallback::{fallback_page, FallbackKind};
use crate::types::{LogicalLine, PageDocument};

/// Split a page's lines into title and body.
///
/// Total and deterministic. A page with no lines, or a blank first line,
/// gets the fallback title.
pub fn classify_page(lines: &[LogicalLine], page_number: usize) -> PageDocument {
    let Some((first, rest)) = lines.split_first() else {
        return fallback_page(FallbackKind::EmptyPage, page_number);
    };

    let title = match first.text.trim() {
        "" => FallbackKind::MissingTitle.title(page_number),
        text => text.to_string(),
    };

    let body = rest
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    PageDocument {
        page_number,
        title,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> LogicalLine {
        LogicalLine::new(text, 0.0)
    }

    #[test]
    fn test_empty_page_fallback() {
        let page = classify_page(&[], 7);
        assert_eq!(page.page_number, 7);
        assert_eq!(page.title, "Page 7");
        assert_eq!(page.body, "");
    }

    #[test]
    fn test_single_line_has_empty_body() {
        let page = classify_page(&[line("Only")], 1);
        assert_eq!(page.title, "Only");
        assert_eq!(page.body, "");
    }

    #[test]
    fn test_title_and_body() {
        let page = classify_page(&[line("Title"), line("one"), line("two")], 2);
        assert_eq!(page.title, "Title");
        assert_eq!(page.body, "one\ntwo");
    }

    #[test]
    fn test_blank_first_line_uses_fallback() {
        let page = classify_page(&[line("  "), line("body")], 3);
        assert_eq!(page.title, "Page 3");
        assert_eq!(page.body, "body");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let lines = vec![line("A"), line("B"), line("C")];
        assert_eq!(classify_page(&lines, 5), classify_page(&lines, 5));
    }
}
