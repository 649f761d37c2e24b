//! PPTX (Office Open XML) writer backend for slide descriptions.
//!
//! Produces a minimal PresentationML package: one master, one blank layout,
//! a theme derived from the style profile, and one slide per description.

mod parts;
mod slide;
mod xml;

pub mod writer;

pub use writer::PptxWriter;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert inches to EMU.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Strip `#` and check for six hex digits, falling back to `fallback`.
pub(crate) fn color_or(color: &str, fallback: &str) -> String {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        hex.to_ascii_uppercase()
    } else {
        log::warn!("Invalid color '{}', using {}", color, fallback);
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emu() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(10.0), 9_144_000);
        assert_eq!(emu(7.5), 6_858_000);
        assert_eq!(emu(0.0), 0);
    }

    #[test]
    fn test_color_or() {
        assert_eq!(color_or("2c5f2d", "000000"), "2C5F2D");
        assert_eq!(color_or("#97BC62", "000000"), "97BC62");
        assert_eq!(color_or("red", "000000"), "000000");
        assert_eq!(color_or("", "FFFFFF"), "FFFFFF");
    }
}
