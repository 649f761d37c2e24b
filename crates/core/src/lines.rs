//! Line reconstruction from positioned text fragments.
//!
//! Decoders emit fragments in drawing order, which is rarely reading order.
//! Fragments are sorted top to bottom, clustered into lines by vertical
//! proximity, and each line is read left to right. This recovers reading
//! order for single-column pages; multi-column pages interleave.

use crate::types::{LogicalLine, TextFragment};
use serde::{Deserialize, Serialize};

/// Default vertical tolerance, in page units, for two fragments to share a line.
pub const DEFAULT_LINE_TOLERANCE: f64 = 5.0;

/// Direction in which the decoder's y coordinate grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    /// PDF convention: y grows toward the top of the page.
    #[default]
    Up,
    /// Screen convention: y grows toward the bottom of the page.
    Down,
}

impl YAxis {
    /// Map a raw y so that larger always means higher on the page.
    pub fn normalize(self, y: f64) -> f64 {
        match self {
            Self::Up => y,
            Self::Down => -y,
        }
    }
}

/// Groups fragments into logical lines.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor {
    /// Maximum y distance between neighbouring fragments of one line.
    tolerance: f64,
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }
}

impl LineReconstructor {
    /// Create a reconstructor with the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom tolerance. Negative or non-finite values fall back to 0.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = if tolerance.is_finite() {
            tolerance.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// The tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Rebuild reading-order lines from an unordered set of fragments.
    ///
    /// Never fails: blank fragments and fragments without a finite position
    /// are dropped, and empty input gives an empty result.
    pub fn reconstruct(&self, fragments: &[TextFragment]) -> Vec<LogicalLine> {
        let mut usable: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .filter(|f| {
                let ok = f.has_finite_position();
                if !ok {
                    log::debug!("Dropping fragment {:?} with unusable position", f.text);
                }
                ok
            })
            .collect();

        // Stable, so fragments at equal y keep encounter order.
        usable.sort_by(|a, b| b.y.total_cmp(&a.y));

        let mut lines = Vec::new();
        let mut group: Vec<&TextFragment> = Vec::new();

        for fragment in usable {
            match group.last() {
                Some(last) if (fragment.y - last.y).abs() <= self.tolerance => {
                    group.push(fragment);
                }
                Some(_) => {
                    lines.extend(flatten_group(std::mem::take(&mut group)));
                    group.push(fragment);
                }
                None => group.push(fragment),
            }
        }

        lines.extend(flatten_group(group));
        lines
    }
}

/// Order a group left to right and join it into one line.
fn flatten_group(mut group: Vec<&TextFragment>) -> Option<LogicalLine> {
    let y = group.first()?.y;
    group.sort_by(|a, b| a.x.total_cmp(&b.x));

    let text = group
        .iter()
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    if text.is_empty() {
        return None;
    }

    Some(LogicalLine {
        text,
        y,
        fragment_count: group.len(),
    })
}

/// Reconstruct lines with the default tolerance.
pub fn reconstruct_lines(fragments: &[TextFragment]) -> Vec<LogicalLine> {
    LineReconstructor::new().reconstruct(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, x, y)
    }

    fn texts(lines: &[LogicalLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct_lines(&[]).is_empty());
    }

    #[test]
    fn test_same_line_joined() {
        let lines = reconstruct_lines(&[frag("Hello", 0.0, 100.0), frag("World", 5.0, 100.0)]);
        assert_eq!(texts(&lines), vec!["Hello World"]);
        assert_eq!(lines[0].fragment_count, 2);
    }

    #[test]
    fn test_distinct_lines_split() {
        let lines = reconstruct_lines(&[frag("Title", 0.0, 200.0), frag("Body", 0.0, 100.0)]);
        assert_eq!(texts(&lines), vec!["Title", "Body"]);
    }

    #[test]
    fn test_line_order_is_permutation_invariant() {
        let base = vec![
            frag("third", 0.0, 50.0),
            frag("first", 0.0, 300.0),
            frag("second", 0.0, 180.0),
            frag("fourth", 0.0, 10.0),
        ];

        let expected = vec!["first", "second", "third", "fourth"];
        let mut input = base.clone();
        for i in 0..input.len() {
            for j in 0..input.len() {
                input.swap(i, j);
                assert_eq!(texts(&reconstruct_lines(&input)), expected);
            }
        }

        let mut reversed = base;
        reversed.reverse();
        assert_eq!(texts(&reconstruct_lines(&reversed)), expected);
    }

    #[test]
    fn test_within_line_sorted_by_x() {
        let base = vec![
            frag("c", 30.0, 100.0),
            frag("a", 10.0, 102.0),
            frag("b", 20.0, 99.0),
        ];
        let mut input = base.clone();
        for i in 0..input.len() {
            for j in 0..input.len() {
                input.swap(i, j);
                assert_eq!(texts(&reconstruct_lines(&input)), vec!["a b c"]);
            }
        }
    }

    #[test]
    fn test_tolerance_is_chained_from_last_fragment() {
        // Each step is within tolerance even though the ends are 8 apart.
        let lines = reconstruct_lines(&[
            frag("a", 0.0, 108.0),
            frag("b", 10.0, 104.0),
            frag("c", 20.0, 100.0),
        ]);
        assert_eq!(texts(&lines), vec!["a b c"]);
    }

    #[test]
    fn test_tolerance_boundary() {
        let at = reconstruct_lines(&[frag("a", 0.0, 105.0), frag("b", 10.0, 100.0)]);
        assert_eq!(texts(&at), vec!["a b"]);

        let beyond = reconstruct_lines(&[frag("a", 0.0, 105.5), frag("b", 10.0, 100.0)]);
        assert_eq!(texts(&beyond), vec!["a", "b"]);
    }

    #[test]
    fn test_custom_tolerance() {
        let input = [frag("a", 0.0, 103.0), frag("b", 10.0, 100.0)];
        let tight = LineReconstructor::new().with_tolerance(2.0);
        assert_eq!(texts(&tight.reconstruct(&input)), vec!["a", "b"]);

        let loose = LineReconstructor::new().with_tolerance(4.0);
        assert_eq!(texts(&loose.reconstruct(&input)), vec!["a b"]);
    }

    #[test]
    fn test_invalid_tolerance_clamped() {
        assert_eq!(LineReconstructor::new().with_tolerance(-3.0).tolerance(), 0.0);
        assert_eq!(LineReconstructor::new().with_tolerance(f64::NAN).tolerance(), 0.0);
    }

    #[test]
    fn test_blank_fragments_discarded() {
        let lines = reconstruct_lines(&[
            frag("   ", 0.0, 300.0),
            frag("", 0.0, 200.0),
            frag("  kept  ", 0.0, 100.0),
        ]);
        assert_eq!(texts(&lines), vec!["kept"]);
    }

    #[test]
    fn test_non_finite_positions_excluded() {
        let lines = reconstruct_lines(&[
            frag("bad", f64::NAN, 100.0),
            frag("worse", 0.0, f64::NAN),
            frag("good", 0.0, 100.0),
        ]);
        assert_eq!(texts(&lines), vec!["good"]);
    }

    #[test]
    fn test_equal_positions_keep_encounter_order() {
        let lines = reconstruct_lines(&[frag("one", 0.0, 100.0), frag("two", 0.0, 100.0)]);
        assert_eq!(texts(&lines), vec!["one two"]);
    }

    #[test]
    fn test_y_axis_normalize() {
        assert_eq!(YAxis::Up.normalize(10.0), 10.0);
        assert_eq!(YAxis::Down.normalize(10.0), -10.0);
    }
}
