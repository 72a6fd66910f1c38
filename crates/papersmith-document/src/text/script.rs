// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script detection and line-break clusters.

/// The Devanagari Unicode block.
pub const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// True if any character of `text` lies in the Devanagari block.
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| DEVANAGARI.contains(&c))
}

const VIRAMA: char = '\u{094D}';
const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

/// Devanagari signs that attach to the preceding character: candrabindu,
/// anusvara, visarga, nukta, dependent vowels, virama, stress/accent marks and
/// the vocalic-L/LL vowel signs.
pub fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0900}'..='\u{0903}' | '\u{093A}'..='\u{094F}' | '\u{0951}'..='\u{0957}' | '\u{0962}'..='\u{0963}')
}

/// Split `word` into the smallest pieces a line may break between.
///
/// A piece is a base character with its combining marks; a virama (and any
/// joiner) binds the following consonant too, so conjuncts stay whole.
pub fn break_clusters(word: &str) -> Vec<&str> {
    let mut clusters = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (i, c) in word.char_indices() {
        let joins = is_combining_mark(c)
            || matches!(c, ZWJ | ZWNJ)
            || matches!(prev, Some(VIRAMA | ZWJ | ZWNJ));
        if i > 0 && !joins {
            clusters.push(&word[start..i]);
            start = i;
        }
        prev = Some(c);
    }
    if start < word.len() {
        clusters.push(&word[start..]);
    }
    clusters
}
