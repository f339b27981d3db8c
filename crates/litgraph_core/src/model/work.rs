//! Work domain model.
//!
//! # Responsibility
//! - Define the canonical work record and its creation draft.
//! - Validate the title field rule.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another work.
//! - `author_id` always references a writer that existed at write time;
//!   existence is resolved by the service layer and backstopped by the
//!   storage foreign key.

use crate::model::writer::WriterId;
use crate::model::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Stable identifier for a work, issued by the store on creation.
pub type WorkId = i64;

/// Canonical work record as persisted and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    /// Store-assigned identity.
    pub id: WorkId,
    pub title: String,
    /// Writer who authored this work.
    pub author_id: WriterId,
}

/// Work fields supplied by callers before an identity exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: String,
    pub author_id: WriterId,
}

impl Work {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_work_fields(&self.title)
    }
}

impl NewWork {
    pub fn new(title: impl Into<String>, author_id: WriterId) -> Self {
        Self {
            title: title.into(),
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_work_fields(&self.title)
    }

    /// Materializes the draft into a full record under a store-assigned id.
    pub fn with_id(&self, id: WorkId) -> Work {
        Work {
            id,
            title: self.title.clone(),
            author_id: self.author_id,
        }
    }
}

fn validate_work_fields(title: &str) -> Result<(), ValidationError> {
    if is_blank(title) {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
