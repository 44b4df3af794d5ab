//! Text width estimation for annotation boxes.
//!
//! Annotations render in Helvetica-Bold; the advance-width table below
//! holds per-character ratios relative to the font size. Input is
//! uppercased before lookup, unknown characters take the default ratio.

use super::config::AnnotConfig;

const DEFAULT_RATIO: f64 = 0.8;

/// Empirical scale between summed advance widths and the rendered box.
const WIDTH_SCALE: f64 = 0.65;

fn char_ratio(c: char) -> f64 {
    match c {
        'A' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.72,
        'B' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.67,
        'E' | 'T' | 'Z' => 0.61,
        'F' | 'L' => 0.56,
        'G' | 'O' | 'Q' => 0.78,
        'I' => 0.28,
        'J' => 0.50,
        'M' => 0.83,
        'W' => 0.94,
        '0'..='9' => 0.56,
        ' ' | '.' | ',' => 0.28,
        '-' => 0.33,
        '_' => 0.50,
        _ => DEFAULT_RATIO,
    }
}

/// Estimates the display width for `text` at `font_size`, adds the
/// configured padding, and clamps to `[cfg.min_width, max_width]`.
///
/// Non-decreasing in text length for a fixed font size.
pub fn text_width(text: &str, font_size: f64, cfg: &AnnotConfig, max_width: f64) -> f64 {
    let advance: f64 = text
        .to_uppercase()
        .chars()
        .map(|c| char_ratio(c) * font_size)
        .sum();
    let width = (advance * WIDTH_SCALE).round() + cfg.text_pad;
    width.clamp(cfg.min_width, max_width)
}
