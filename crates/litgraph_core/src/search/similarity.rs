//! Trigram string similarity.
//!
//! # Responsibility
//! - Score textual closeness of two strings in `[0, 1]`.
//!
//! # Invariants
//! - Symmetric: `trigram_similarity(a, b) == trigram_similarity(b, a)`.
//! - Identical strings score 1.0; strings sharing no trigram score 0.0.
//! - Case and punctuation do not affect the score.

use std::collections::BTreeSet;

/// Minimum score a candidate must exceed to appear in search results.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Scores two strings as `|shared trigrams| / |union of trigrams|`.
///
/// Each string is lowercased and split into alphanumeric words; every word
/// is padded with two leading spaces and one trailing space before its
/// character trigrams are collected. Small edits and transpositions lose a
/// few trigrams and keep the rest, which is what gives partial credit.
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let left = trigram_set(a);
    let right = trigram_set(b);

    if left.is_empty() && right.is_empty() {
        // No indexable content; only the identical string counts as a match.
        return if a == b { 1.0 } else { 0.0 };
    }

    let shared = left.intersection(&right).count();
    let total = left.len() + right.len() - shared;
    shared as f64 / total as f64
}

fn trigram_set(text: &str) -> BTreeSet<(char, char, char)> {
    let mut trigrams = BTreeSet::new();
    let lowered = text.to_lowercase();

    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }

        let mut padded: Vec<char> = Vec::with_capacity(word.chars().count() + 3);
        padded.push(' ');
        padded.push(' ');
        padded.extend(word.chars());
        padded.push(' ');

        for window in padded.windows(3) {
            trigrams.insert((window[0], window[1], window[2]));
        }
    }

    trigrams
}
