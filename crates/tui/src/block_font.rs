use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 3;
const LETTER_GAP: usize = 1;
const FILL_CHAR: char = '█';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["111", "1 1", "1 1", "1 1", "111"]),
        ('1', [" 1 ", "11 ", " 1 ", " 1 ", "111"]),
        ('2', ["111", "  1", "111", "1  ", "111"]),
        ('3', ["111", "  1", " 11", "  1", "111"]),
        ('4', ["1 1", "1 1", "111", "  1", "  1"]),
        ('5', ["111", "1  ", "111", "  1", "111"]),
        ('6', ["111", "1  ", "111", "1 1", "111"]),
        ('7', ["111", "  1", " 1 ", " 1 ", " 1 "]),
        ('8', ["111", "1 1", "111", "1 1", "111"]),
        ('9', ["111", "1 1", "111", "  1", "111"]),
        ('?', ["111", "  1", " 11", "   ", " 1 "]),
        (' ', ["   ", "   ", "   ", "   ", "   "]),
    ])
});

/// Width in columns of `text` once rendered.
pub fn width(text: &str) -> usize {
    let count = text.chars().count();
    if count == 0 {
        return 0;
    }
    count * FONT_WIDTH + (count - 1) * LETTER_GAP
}

/// Render `text` as block digits. Characters without a glyph render as `?`.
pub fn render(text: &str) -> Vec<String> {
    let mut rows = vec![String::new(); FONT_HEIGHT];
    for (idx, ch) in text.chars().enumerate() {
        let glyph = GLYPHS
            .get(&ch)
            .or_else(|| GLYPHS.get(&'?'))
            .copied()
            .unwrap_or([""; FONT_HEIGHT]);
        for (row, pattern) in rows.iter_mut().zip(glyph.iter()) {
            if idx > 0 {
                row.extend(std::iter::repeat(' ').take(LETTER_GAP));
            }
            row.extend(
                pattern
                    .chars()
                    .map(|cell| if cell == '1' { FILL_CHAR } else { ' ' }),
            );
        }
    }
    rows
}
