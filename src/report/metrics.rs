//! Helvetica glyph metrics used to size columns.

use unicode_width::UnicodeWidthChar;

/// Advance widths (1/1000 em) for ASCII 32..=126, from the standard
/// Helvetica AFM with WinAnsi encoding.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width used for glyphs outside the table.
const FALLBACK_GLYPH: u16 = 556;

fn glyph_units(c: char) -> u32 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        return HELVETICA_ASCII[(code - 32) as usize] as u32;
    }
    let columns = c.width().unwrap_or(0) as u32;
    FALLBACK_GLYPH as u32 * columns
}

/// Rendered width of `text` in points at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_units).sum();
    units as f32 * size / 1000.0
}
