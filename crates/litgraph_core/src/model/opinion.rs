//! Opinion domain model.
//!
//! # Responsibility
//! - Define the third-party statement record keyed by `(writer_id, work_id)`.
//! - Validate quote/source field rules in reporting order.
//!
//! # Invariants
//! - At most one opinion exists per `(writer_id, work_id)` pair.
//! - `writer_id` must never equal the author of the referenced work; the
//!   rule is enforced by the service layer and again by a storage trigger.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::work::WorkId;
use crate::model::writer::WriterId;
use crate::model::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// A recorded statement by one writer about another writer's work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opinion {
    /// Writer holding the opinion. Half of the composite identity.
    pub writer_id: WriterId,
    /// Work the opinion is about. The other half of the identity.
    pub work_id: WorkId,
    /// `true` for approval, `false` for disapproval.
    pub sentiment: bool,
    /// Verbatim quoted statement.
    pub quote: String,
    /// Publication or document the quote was taken from.
    pub source: String,
    /// Optional page or locator within the source.
    pub page: Option<String>,
    /// Optional year the statement was made.
    pub statement_year: Option<i32>,
}

impl Opinion {
    /// Creates an opinion with both optional fields unset.
    pub fn new(
        writer_id: WriterId,
        work_id: WorkId,
        sentiment: bool,
        quote: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            writer_id,
            work_id,
            sentiment,
            quote: quote.into(),
            source: source.into(),
            page: None,
            statement_year: None,
        }
    }

    /// Checks field rules: quote first, then source.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.quote) {
            return Err(ValidationError::EmptyQuote);
        }
        if is_blank(&self.source) {
            return Err(ValidationError::EmptySource);
        }
        Ok(())
    }
}
