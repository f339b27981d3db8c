//! Opinion use-case service.
//!
//! # Responsibility
//! - Provide opinion CRUD entry points keyed by `(writer_id, work_id)`.
//! - Apply the self-opinion check before any write reaches storage.
//!
//! # Invariants
//! - Check order on create: quote, source, work existence, self-opinion,
//!   writer existence. A failed self-opinion check is reported without
//!   revealing whether the writer id itself resolves.
//! - Update repeats the work lookup and self-opinion check; the work's
//!   author may have changed since the opinion was created.
//! - The storage triggers re-evaluate the same predicate inside the write;
//!   either layer alone is sufficient to hold the invariant.

use crate::model::opinion::Opinion;
use crate::model::work::WorkId;
use crate::model::writer::WriterId;
use crate::repo::opinion_repo::OpinionRepository;
use crate::repo::work_repo::WorkRepository;
use crate::repo::writer_repo::WriterRepository;
use crate::repo::ListPage;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Use-case service for opinion operations.
pub struct OpinionService<O, W, K>
where
    O: OpinionRepository,
    W: WriterRepository,
    K: WorkRepository,
{
    opinions: O,
    writers: W,
    works: K,
}

impl<O, W, K> OpinionService<O, W, K>
where
    O: OpinionRepository,
    W: WriterRepository,
    K: WorkRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(opinions: O, writers: W, works: K) -> Self {
        Self {
            opinions,
            writers,
            works,
        }
    }

    /// Records a new opinion after the full check sequence.
    pub fn create_opinion(&self, opinion: &Opinion) -> ServiceResult<()> {
        opinion.validate()?;
        self.check_not_own_work(opinion)?;

        if self.writers.get_writer(opinion.writer_id)?.is_none() {
            return Err(ServiceError::WriterNotFound(opinion.writer_id));
        }

        self.opinions.create_opinion(opinion)?;
        info!(
            "event=opinion_create module=service status=ok writer_id={} work_id={}",
            opinion.writer_id, opinion.work_id
        );
        Ok(())
    }

    /// Gets one opinion by its composite key.
    pub fn get_opinion(&self, writer_id: WriterId, work_id: WorkId) -> ServiceResult<Opinion> {
        self.opinions
            .get_opinion(writer_id, work_id)?
            .ok_or(ServiceError::OpinionNotFound { writer_id, work_id })
    }

    /// Lists every opinion held by the given writer.
    pub fn get_opinions_by_writer(&self, writer_id: WriterId) -> ServiceResult<Vec<Opinion>> {
        Ok(self.opinions.get_opinions_by_writer(writer_id)?)
    }

    /// Lists every opinion recorded about the given work.
    pub fn get_opinions_by_work(&self, work_id: WorkId) -> ServiceResult<Vec<Opinion>> {
        Ok(self.opinions.get_opinions_by_work(work_id)?)
    }

    /// Lists opinions in stable composite-key order.
    pub fn list_opinions(&self, page: &ListPage) -> ServiceResult<Vec<Opinion>> {
        Ok(self.opinions.list_opinions(page)?)
    }

    /// Replaces the mutable fields of an existing opinion.
    ///
    /// The composite key is immutable; the self-opinion predicate is still
    /// re-evaluated against the work's current author.
    pub fn update_opinion(&self, opinion: &Opinion) -> ServiceResult<()> {
        opinion.validate()?;
        self.check_not_own_work(opinion)?;

        self.opinions.update_opinion(opinion)?;
        info!(
            "event=opinion_update module=service status=ok writer_id={} work_id={}",
            opinion.writer_id, opinion.work_id
        );
        Ok(())
    }

    /// Deletes one opinion by its composite key.
    pub fn delete_opinion(&self, writer_id: WriterId, work_id: WorkId) -> ServiceResult<()> {
        self.opinions.delete_opinion(writer_id, work_id)?;
        info!(
            "event=opinion_delete module=service status=ok writer_id={} work_id={}",
            writer_id, work_id
        );
        Ok(())
    }

    /// Resolves the referenced work and rejects opinions on one's own work.
    fn check_not_own_work(&self, opinion: &Opinion) -> ServiceResult<()> {
        let work = self
            .works
            .get_work(opinion.work_id)?
            .ok_or(ServiceError::WorkNotFound(opinion.work_id))?;

        if work.author_id == opinion.writer_id {
            info!(
                "event=opinion_rejected module=service reason=self_opinion writer_id={} work_id={}",
                opinion.writer_id, opinion.work_id
            );
            return Err(ServiceError::SelfOpinion {
                writer_id: opinion.writer_id,
                work_id: opinion.work_id,
            });
        }

        Ok(())
    }
}
