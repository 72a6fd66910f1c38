// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text measurement and word wrapping.
//
// Widths come from the Helvetica advance table (units per 1000 em) for
// printable ASCII; anything else is measured at the average lowercase width.
// This is basic measurement only: no kerning, no shaping.

use papersmith_core::config::PT_TO_MM;

use super::FontWeight;
use super::script::break_clusters;

/// Helvetica advances for U+0020..=U+007E.
const HELVETICA_ADVANCE: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Fallback advance for characters outside the table.
const DEFAULT_ADVANCE: u16 = 556;

/// Helvetica-Bold runs roughly this much wider than the regular cut.
const BOLD_FACTOR: f32 = 1.06;

/// Average glyph width (in em) assumed for secondary-script line estimates.
const RASTER_CHAR_EM: f32 = 0.55;

fn advance(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_ADVANCE[(code - 0x20) as usize]
    } else {
        DEFAULT_ADVANCE
    }
}

/// Width of `text` in millimetres when set in Helvetica at `font_size` points.
pub fn text_width_mm(text: &str, font_size: f32, weight: FontWeight) -> f32 {
    let units: u32 = text.chars().map(|c| advance(c) as u32).sum();
    let width = units as f32 / 1000.0 * font_size * PT_TO_MM;
    match weight {
        FontWeight::Regular => width,
        FontWeight::Bold => width * BOLD_FACTOR,
    }
}

/// Characters per line assumed for secondary-script text of `font_size`
/// wrapped at `max_width_mm`.
pub fn chars_per_line(max_width_mm: f32, font_size: f32) -> usize {
    let char_mm = font_size * PT_TO_MM * RASTER_CHAR_EM;
    ((max_width_mm / char_mm).floor() as usize).max(1)
}

/// Width assumed for a secondary-script line of `font_size`, matching
/// [`chars_per_line`].
pub fn raster_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * PT_TO_MM * RASTER_CHAR_EM
}

/// Word-wrap `text` so no line is wider than `max_width_mm`.
///
/// Splits on existing newlines first, then greedily packs words. Words wider
/// than the limit are force-broken between Devanagari clusters, so no line
/// starts with a combining mark or ends on a virama.
pub fn wrap_to_width(text: &str, max_width_mm: f32, font_size: f32, weight: FontWeight) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, font_size, weight) <= max_width_mm;
    wrap_with(text, fits)
}

/// Word-wrap `text` at a fixed number of characters per line.
pub fn wrap_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    wrap_with(text, |s: &str| s.chars().count() <= max_chars)
}

fn wrap_with(text: &str, fits: impl Fn(&str) -> bool) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::new();

        for word in words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };

            if fits(&candidate) {
                current_line = candidate;
                continue;
            }

            if !current_line.is_empty() {
                result.push(std::mem::take(&mut current_line));
            }

            if fits(word) {
                current_line.push_str(word);
            } else {
                // Force-break the oversized word between clusters only. A single
                // cluster wider than the limit stays whole.
                for cluster in break_clusters(word) {
                    let candidate = format!("{current_line}{cluster}");
                    if current_line.is_empty() || fits(&candidate) {
                        current_line = candidate;
                    } else {
                        result.push(std::mem::take(&mut current_line));
                        current_line.push_str(cluster);
                    }
                }
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    // Trailing newlines do not add blank lines.
    while result.len() > 1 && result.last().is_some_and(String::is_empty) {
        result.pop();
    }
    result
}
