//! Work use-case service.
//!
//! # Responsibility
//! - Provide work CRUD entry points for core callers.
//! - Resolve author existence before any work write.
//!
//! # Invariants
//! - The title rule is checked before the author reference is resolved.
//! - On update, the work's own existence is confirmed before the author's.
//! - Deleting a work also deletes the opinions recorded about it.

use crate::model::work::{NewWork, Work, WorkId};
use crate::model::writer::WriterId;
use crate::repo::work_repo::WorkRepository;
use crate::repo::writer_repo::WriterRepository;
use crate::repo::ListPage;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Use-case service for work operations.
pub struct WorkService<K, W>
where
    K: WorkRepository,
    W: WriterRepository,
{
    works: K,
    writers: W,
}

impl<K, W> WorkService<K, W>
where
    K: WorkRepository,
    W: WriterRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(works: K, writers: W) -> Self {
        Self { works, writers }
    }

    /// Validates the title, confirms the author exists, and persists.
    ///
    /// Returns the record with its store-assigned id.
    pub fn create_work(&self, draft: &NewWork) -> ServiceResult<Work> {
        draft.validate()?;
        self.require_writer(draft.author_id)?;

        let work = self.works.create_work(draft)?;
        info!(
            "event=work_create module=service status=ok work_id={} author_id={}",
            work.id, work.author_id
        );
        Ok(work)
    }

    /// Gets one work by id.
    pub fn get_work(&self, id: WorkId) -> ServiceResult<Work> {
        self.works
            .get_work(id)?
            .ok_or(ServiceError::WorkNotFound(id))
    }

    /// Lists every work authored by the given writer.
    pub fn get_works_by_author(&self, author_id: WriterId) -> ServiceResult<Vec<Work>> {
        Ok(self.works.get_works_by_author(author_id)?)
    }

    /// Lists works in stable id order.
    pub fn list_works(&self, page: &ListPage) -> ServiceResult<Vec<Work>> {
        Ok(self.works.list_works(page)?)
    }

    /// Replaces the mutable fields of an existing work.
    ///
    /// Check order: title rule, then work existence, then author existence.
    pub fn update_work(&self, id: WorkId, draft: &NewWork) -> ServiceResult<()> {
        draft.validate()?;
        self.get_work(id)?;
        self.require_writer(draft.author_id)?;

        self.works.update_work(&draft.with_id(id))?;
        info!("event=work_update module=service status=ok work_id={}", id);
        Ok(())
    }

    /// Deletes a work and, with it, every opinion recorded about it.
    pub fn delete_work(&self, id: WorkId) -> ServiceResult<()> {
        self.get_work(id)?;
        self.works.delete_work(id)?;
        info!("event=work_delete module=service status=ok work_id={}", id);
        Ok(())
    }

    fn require_writer(&self, id: WriterId) -> ServiceResult<()> {
        self.writers
            .get_writer(id)?
            .map(|_| ())
            .ok_or(ServiceError::WriterNotFound(id))
    }
}
