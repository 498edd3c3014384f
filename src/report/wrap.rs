//! Word wrapping of cell text against measured glyph widths.

use crate::report::metrics::text_width;
use textwrap::WordSeparator;
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

/// Tolerance for float rounding in width arithmetic, in points.
const WIDTH_SLACK: f32 = 0.01;

#[derive(Debug)]
struct MeasuredWord<'a> {
    text: &'a str,
    whitespace: &'a str,
    width: f64,
    whitespace_width: f64,
}

impl Fragment for MeasuredWord<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.whitespace_width
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Split `text` into lines no wider than `max_width` points.
///
/// Explicit newlines are kept. Words wider than a line are broken between
/// characters. Empty text yields no lines.
pub fn wrap_cell(text: &str, max_width: f32, size: f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    // a column planned at its natural width must hold its widest cell
    let max_width = max_width + WIDTH_SLACK;

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut fragments = Vec::new();

        for word in WordSeparator::AsciiSpace.find_words(paragraph) {
            let pieces = split_long_word(word.word, max_width, size);
            let last = pieces.len().saturating_sub(1);

            for (i, piece) in pieces.into_iter().enumerate() {
                let whitespace = if i == last { word.whitespace } else { "" };
                fragments.push(MeasuredWord {
                    text: piece,
                    whitespace,
                    width: text_width(piece, size) as f64,
                    whitespace_width: text_width(whitespace, size) as f64,
                });
            }
        }

        if fragments.is_empty() {
            lines.push(String::new());
            continue;
        }

        for line in wrap_first_fit(&fragments, &[max_width as f64]) {
            let mut out = String::new();
            for (i, frag) in line.iter().enumerate() {
                out.push_str(frag.text);
                if i + 1 < line.len() {
                    out.push_str(frag.whitespace);
                }
            }
            lines.push(out);
        }
    }

    lines
}

fn split_long_word(word: &str, max_width: f32, size: f32) -> Vec<&str> {
    if text_width(word, size) <= max_width {
        return vec![word];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current = 0.0_f32;

    for (idx, ch) in word.char_indices() {
        let mut buf = [0u8; 4];
        let w = text_width(ch.encode_utf8(&mut buf), size);
        if current + w > max_width && idx > start {
            pieces.push(&word[start..idx]);
            start = idx;
            current = 0.0;
        }
        current += w;
    }
    pieces.push(&word[start..]);

    pieces
}
