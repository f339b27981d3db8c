//! Writer ranking for fuzzy search.
//!
//! # Responsibility
//! - Score writer candidates against a query and order them for paging.
//!
//! # Invariants
//! - A candidate is kept when either its name score or bio score exceeds
//!   the threshold; it is ranked by the larger of the two.
//! - An absent bio scores 0.
//! - Ordering is deterministic: score descending, then id ascending.

use crate::model::writer::Writer;
use crate::search::similarity::{trigram_similarity, SIMILARITY_THRESHOLD};

/// One writer admitted to search results, with its ranking score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedWriter {
    pub writer: Writer,
    /// `max(name score, bio score)` against the query.
    pub score: f64,
}

/// Scores a single writer against the query.
pub fn score_writer(writer: &Writer, query: &str) -> f64 {
    let name_score = trigram_similarity(query, &writer.name);
    let bio_score = writer
        .bio
        .as_deref()
        .map_or(0.0, |bio| trigram_similarity(query, bio));
    name_score.max(bio_score)
}

/// Filters candidates by threshold and orders them for presentation.
pub fn rank_writers(candidates: Vec<Writer>, query: &str) -> Vec<RankedWriter> {
    let mut ranked: Vec<RankedWriter> = candidates
        .into_iter()
        .filter_map(|writer| {
            let score = score_writer(&writer, query);
            if score > SIMILARITY_THRESHOLD {
                Some(RankedWriter { writer, score })
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.writer.id.cmp(&b.writer.id))
    });

    ranked
}
