//! Writer domain model.
//!
//! # Responsibility
//! - Define the canonical writer record and its creation draft.
//! - Validate name/birth-year field rules in reporting order.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another writer.
//! - `name` is non-empty and `birth_year` positive after validation.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier for a writer, issued by the store on creation.
pub type WriterId = i64;

/// Canonical writer record as persisted and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Writer {
    /// Store-assigned identity.
    pub id: WriterId,
    pub name: String,
    pub birth_year: i32,
    /// `None` while the writer is alive or the year is unknown.
    pub death_year: Option<i32>,
    /// Free-text biography; scored by fuzzy search alongside `name`.
    pub bio: Option<String>,
}

/// Writer fields supplied by callers before an identity exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWriter {
    pub name: String,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub bio: Option<String>,
}

impl Writer {
    /// Checks field rules: name first, then birth year.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_writer_fields(&self.name, self.birth_year)
    }
}

impl NewWriter {
    /// Creates a draft with both optional fields unset.
    pub fn new(name: impl Into<String>, birth_year: i32) -> Self {
        Self {
            name: name.into(),
            birth_year,
            death_year: None,
            bio: None,
        }
    }

    /// Checks field rules: name first, then birth year.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_writer_fields(&self.name, self.birth_year)
    }

    /// Materializes the draft into a full record under a store-assigned id.
    pub fn with_id(&self, id: WriterId) -> Writer {
        Writer {
            id,
            name: self.name.clone(),
            birth_year: self.birth_year,
            death_year: self.death_year,
            bio: self.bio.clone(),
        }
    }
}

fn validate_writer_fields(name: &str, birth_year: i32) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::EmptyName);
    }
    if birth_year <= 0 {
        return Err(ValidationError::NonPositiveBirthYear);
    }
    Ok(())
}
