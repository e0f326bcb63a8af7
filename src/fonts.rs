//! Text measurement for the builtin Helvetica family.
//!
//! Letters are rendered with the PDF base-14 Helvetica fonts, so we measure
//! with the published AFM advance widths instead of parsing font files at
//! runtime. Regular and bold have distinct tables; the oblique variants share
//! their upright counterpart's widths, so only the bold flag affects
//! measurement.

/// Width of a string in points at the given font size.
pub fn text_width(text: &str, bold: bool, size: f32) -> f32 {
    let units: f32 = text.chars().map(|c| char_width_units(c, bold)).sum();
    units * size / 1000.0
}

/// Advance width of one character in 1/1000 em.
fn char_width_units(c: char, bold: bool) -> f32 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        let table = if bold { &WIDTHS_BOLD } else { &WIDTHS_REGULAR };
        return table[(code - 0x20) as usize] as f32;
    }
    match c {
        '\u{00DF}' => 611.0,  // ß
        '\u{2013}' => 556.0,  // en dash
        '\u{2014}' => 1000.0, // em dash
        '\u{2022}' => 350.0,  // bullet
        '\u{20AC}' => 556.0,  // euro
        '\u{2018}' | '\u{2019}' => {
            if bold {
                278.0
            } else {
                222.0
            }
        }
        '\u{201C}' | '\u{201D}' | '\u{201E}' => {
            if bold {
                500.0
            } else {
                333.0
            }
        }
        _ => match fold_diacritic(c) {
            // Accented Latin letters carry the advance of their base letter.
            Some(base) => char_width_units(base, bold),
            None => DEFAULT_WIDTH,
        },
    }
}

/// Fallback advance for characters outside the tables.
const DEFAULT_WIDTH: f32 = 556.0;

fn fold_diacritic(c: char) -> Option<char> {
    Some(match c {
        'à'..='å' => 'a',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        'À'..='Å' => 'A',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        'Ý' => 'Y',
        _ => return None,
    })
}

/// Helvetica advance widths for chars 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const WIDTHS_REGULAR: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for chars 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const WIDTHS_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
