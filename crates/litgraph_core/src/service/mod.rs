//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce cross-entity rules and the caller-facing error taxonomy.
//!
//! # Invariants
//! - Check order is part of the contract: field rules before reference
//!   resolution, the self-opinion rule before writer existence.
//! - Services never recover silently; every collaborator failure aborts the
//!   operation and is returned tagged with its kind.

use crate::model::work::WorkId;
use crate::model::writer::WriterId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod opinion_service;
pub mod work_service;
pub mod writer_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error taxonomy for all service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// A field-level rule was violated; recoverable by correcting input.
    Validation(ValidationError),
    WriterNotFound(WriterId),
    WorkNotFound(WorkId),
    OpinionNotFound {
        writer_id: WriterId,
        work_id: WorkId,
    },
    /// The writer authored the referenced work. Raised by the service
    /// predicate or mapped from the storage guard; callers cannot tell the
    /// two apart, which is the point.
    SelfOpinion {
        writer_id: WriterId,
        work_id: WorkId,
    },
    /// The writer still has works and cannot be deleted.
    WriterHasWorks {
        writer_id: WriterId,
        work_count: usize,
    },
    /// Any lower-layer fault, propagated without retry.
    Storage(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::WriterNotFound(id) => write!(f, "writer not found: {id}"),
            Self::WorkNotFound(id) => write!(f, "work not found: {id}"),
            Self::OpinionNotFound { writer_id, work_id } => {
                write!(f, "opinion not found: writer {writer_id}, work {work_id}")
            }
            Self::SelfOpinion { writer_id, work_id } => write!(
                f,
                "writer cannot express opinion about their own work (writer {writer_id}, work {work_id})"
            ),
            Self::WriterHasWorks {
                writer_id,
                work_count,
            } => write!(
                f,
                "cannot delete writer with existing works (writer {writer_id} has {work_count})"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::WriterNotFound(id) => Self::WriterNotFound(id),
            RepoError::WorkNotFound(id) => Self::WorkNotFound(id),
            RepoError::OpinionNotFound { writer_id, work_id } => {
                Self::OpinionNotFound { writer_id, work_id }
            }
            RepoError::SelfOpinion { writer_id, work_id } => {
                Self::SelfOpinion { writer_id, work_id }
            }
            other => Self::Storage(other),
        }
    }
}
