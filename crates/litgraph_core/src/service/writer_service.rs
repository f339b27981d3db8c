//! Writer use-case service.
//!
//! # Responsibility
//! - Provide writer CRUD and fuzzy-search entry points for core callers.
//! - Guard writer deletion against remaining works.
//!
//! # Invariants
//! - Field rules are checked before any repository read or write.
//! - A writer with works is never deleted; the check lists works first.
//! - Blank search queries fall back to plain listing, never to ranking.

use crate::model::writer::{NewWriter, Writer, WriterId};
use crate::repo::work_repo::WorkRepository;
use crate::repo::writer_repo::WriterRepository;
use crate::repo::ListPage;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Use-case service for writer operations.
pub struct WriterService<W, K>
where
    W: WriterRepository,
    K: WorkRepository,
{
    writers: W,
    works: K,
}

impl<W, K> WriterService<W, K>
where
    W: WriterRepository,
    K: WorkRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(writers: W, works: K) -> Self {
        Self { writers, works }
    }

    /// Validates field rules and persists a new writer.
    ///
    /// Returns the record with its store-assigned id.
    pub fn create_writer(&self, draft: &NewWriter) -> ServiceResult<Writer> {
        draft.validate()?;
        let writer = self.writers.create_writer(draft)?;
        info!(
            "event=writer_create module=service status=ok writer_id={}",
            writer.id
        );
        Ok(writer)
    }

    /// Gets one writer by id.
    pub fn get_writer(&self, id: WriterId) -> ServiceResult<Writer> {
        self.writers
            .get_writer(id)?
            .ok_or(ServiceError::WriterNotFound(id))
    }

    /// Lists writers in stable id order.
    pub fn list_writers(&self, page: &ListPage) -> ServiceResult<Vec<Writer>> {
        Ok(self.writers.list_writers(page)?)
    }

    /// Searches writers by similarity of name/bio to `query`.
    ///
    /// A blank query returns the plain listing in store order.
    pub fn search_writers(&self, query: &str, page: &ListPage) -> ServiceResult<Vec<Writer>> {
        if query.trim().is_empty() {
            return self.list_writers(page);
        }
        Ok(self.writers.search_writers(query, page)?)
    }

    /// Replaces the mutable fields of an existing writer.
    pub fn update_writer(&self, id: WriterId, draft: &NewWriter) -> ServiceResult<()> {
        draft.validate()?;
        self.writers.update_writer(&draft.with_id(id))?;
        info!(
            "event=writer_update module=service status=ok writer_id={}",
            id
        );
        Ok(())
    }

    /// Deletes a writer with no remaining works.
    ///
    /// Any recorded opinions held by the writer are removed with them.
    pub fn delete_writer(&self, id: WriterId) -> ServiceResult<()> {
        let works = self.works.get_works_by_author(id)?;
        if !works.is_empty() {
            info!(
                "event=writer_delete module=service status=blocked writer_id={} work_count={}",
                id,
                works.len()
            );
            return Err(ServiceError::WriterHasWorks {
                writer_id: id,
                work_count: works.len(),
            });
        }

        self.writers.delete_writer(id)?;
        info!(
            "event=writer_delete module=service status=ok writer_id={}",
            id
        );
        Ok(())
    }
}
