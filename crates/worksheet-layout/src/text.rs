//! Text measurement and line breaking
//!
//! Both renderers break problem text with [`wrap_text`], so a problem has the
//! same lines whichever backend draws it. Widths are estimated from an
//! average Helvetica glyph width rather than real font metrics.

use crate::notation::to_plain;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Baseline-to-baseline distance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Estimated advance width of `text` once formatted for display
pub fn text_width_pt(text: &str, font_size_pt: f32) -> f32 {
    to_plain(text).chars().count() as f32 * font_size_pt * HELVETICA_CHAR_WIDTH_RATIO
}

/// Height of `line_count` lines set at `font_size_pt`
pub fn lines_height_pt(line_count: usize, font_size_pt: f32) -> f32 {
    line_count as f32 * font_size_pt * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap of `text` into lines no wider than `max_width_pt`
///
/// Explicit newlines start a new line. Words wider than a whole line are
/// split between characters. Always returns at least one line.
pub fn wrap_text(text: &str, max_width_pt: f32, font_size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width_pt(&candidate, font_size_pt) <= max_width_pt {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width_pt(word, font_size_pt) <= max_width_pt {
                current = word.to_string();
            } else {
                let mut pieces = split_long_word(word, max_width_pt, font_size_pt);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_long_word(word: &str, max_width_pt: f32, font_size_pt: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if piece.chars().count() > 1 && text_width_pt(&piece, font_size_pt) > max_width_pt {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    pieces.push(piece);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("12 + 7 =", 200.0, 10.0), vec!["12 + 7 ="]);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        // 5pt per char at 10pt: 50pt fits 10 chars
        let lines = wrap_text("aaaa bbbb cccc", 50.0, 10.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_explicit_newlines_are_kept() {
        let lines = wrap_text("first\nsecond", 500.0, 10.0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_text("abcdefghijkl", 25.0, 10.0);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        assert_eq!(wrap_text("", 100.0, 10.0), vec![String::new()]);
    }
}
