//! Work repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `works` storage.
//! - Expose the author-id secondary-index lookup used by the
//!   delete-writer guard.
//!
//! # Invariants
//! - Write paths validate field rules before SQL mutations.
//! - `works.author_id` is a foreign key; inserts and updates naming a
//!   missing writer fail at the storage layer as well as in the service.
//! - Deleting a work cascades to its opinions in the same statement.

use crate::model::work::{NewWork, Work, WorkId};
use crate::model::writer::WriterId;
use crate::repo::{
    ensure_connection_migrated, ensure_table_with_columns, push_page_clause, ListPage, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const WORK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author_id
FROM works";

/// Repository interface for work CRUD operations.
pub trait WorkRepository {
    /// Persists a new work and returns the record with its assigned id.
    fn create_work(&self, draft: &NewWork) -> RepoResult<Work>;
    fn get_work(&self, id: WorkId) -> RepoResult<Option<Work>>;
    /// Lists every work authored by the given writer, in id order.
    fn get_works_by_author(&self, author_id: WriterId) -> RepoResult<Vec<Work>>;
    /// Lists works in stable id order.
    fn list_works(&self, page: &ListPage) -> RepoResult<Vec<Work>>;
    fn update_work(&self, work: &Work) -> RepoResult<()>;
    fn delete_work(&self, id: WorkId) -> RepoResult<()>;
}

/// SQLite-backed work repository.
pub struct SqliteWorkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_migrated(conn)?;
        ensure_table_with_columns(conn, "works", &["id", "title", "author_id"])?;
        Ok(Self { conn })
    }
}

impl WorkRepository for SqliteWorkRepository<'_> {
    fn create_work(&self, draft: &NewWork) -> RepoResult<Work> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO works (title, author_id) VALUES (?1, ?2);",
            params![draft.title.as_str(), draft.author_id],
        )?;

        Ok(draft.with_id(self.conn.last_insert_rowid()))
    }

    fn get_work(&self, id: WorkId) -> RepoResult<Option<Work>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_work_row(row)?));
        }

        Ok(None)
    }

    fn get_works_by_author(&self, author_id: WriterId) -> RepoResult<Vec<Work>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORK_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([author_id])?;
        let mut works = Vec::new();
        while let Some(row) = rows.next()? {
            works.push(parse_work_row(row)?);
        }

        Ok(works)
    }

    fn list_works(&self, page: &ListPage) -> RepoResult<Vec<Work>> {
        let mut sql = format!("{WORK_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_page_clause(&mut sql, &mut bind_values, page);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut works = Vec::new();

        while let Some(row) = rows.next()? {
            works.push(parse_work_row(row)?);
        }

        Ok(works)
    }

    fn update_work(&self, work: &Work) -> RepoResult<()> {
        work.validate()?;

        let changed = self.conn.execute(
            "UPDATE works
             SET
                title = ?1,
                author_id = ?2
             WHERE id = ?3;",
            params![work.title.as_str(), work.author_id, work.id],
        )?;

        if changed == 0 {
            return Err(RepoError::WorkNotFound(work.id));
        }

        Ok(())
    }

    fn delete_work(&self, id: WorkId) -> RepoResult<()> {
        // ON DELETE CASCADE removes the work's opinions in the same statement.
        let changed = self.conn.execute("DELETE FROM works WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::WorkNotFound(id));
        }

        Ok(())
    }
}

fn parse_work_row(row: &Row<'_>) -> RepoResult<Work> {
    Ok(Work {
        id: row.get("id")?,
        title: row.get("title")?,
        author_id: row.get("author_id")?,
    })
}
