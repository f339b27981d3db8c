//! Similarity search entry points.
//!
//! # Responsibility
//! - Provide the trigram similarity measure and writer ranking built on it.
//! - Keep scoring and threshold semantics inside core.
//!
//! # Invariants
//! - Scores are symmetric values in `[0, 1]`.
//! - Candidates enter results only above `SIMILARITY_THRESHOLD`.

pub mod similarity;
pub mod writer_search;
