//! Writer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and similarity-search APIs over `writers` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate field rules before SQL mutations.
//! - `create_writer` returns the store-assigned id; callers never pick ids.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::writer::{NewWriter, Writer, WriterId};
use crate::repo::{
    ensure_connection_migrated, ensure_table_with_columns, push_page_clause, ListPage, RepoError,
    RepoResult,
};
use crate::search::writer_search::rank_writers;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const WRITER_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_year,
    death_year,
    bio
FROM writers";

/// Repository interface for writer CRUD and fuzzy search.
pub trait WriterRepository {
    /// Persists a new writer and returns the record with its assigned id.
    fn create_writer(&self, draft: &NewWriter) -> RepoResult<Writer>;
    fn get_writer(&self, id: WriterId) -> RepoResult<Option<Writer>>;
    /// Lists writers in stable id order.
    fn list_writers(&self, page: &ListPage) -> RepoResult<Vec<Writer>>;
    /// Ranks writers by trigram similarity of `name`/`bio` against `query`.
    ///
    /// Pagination applies after ranking. Blank-query fallback to plain
    /// listing is a service-layer concern, not handled here.
    fn search_writers(&self, query: &str, page: &ListPage) -> RepoResult<Vec<Writer>>;
    fn update_writer(&self, writer: &Writer) -> RepoResult<()>;
    fn delete_writer(&self, id: WriterId) -> RepoResult<()>;
}

/// SQLite-backed writer repository.
pub struct SqliteWriterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWriterRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_migrated(conn)?;
        ensure_table_with_columns(
            conn,
            "writers",
            &["id", "name", "birth_year", "death_year", "bio"],
        )?;
        Ok(Self { conn })
    }
}

impl WriterRepository for SqliteWriterRepository<'_> {
    fn create_writer(&self, draft: &NewWriter) -> RepoResult<Writer> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO writers (name, birth_year, death_year, bio)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.as_str(),
                draft.birth_year,
                draft.death_year,
                draft.bio.as_deref(),
            ],
        )?;

        Ok(draft.with_id(self.conn.last_insert_rowid()))
    }

    fn get_writer(&self, id: WriterId) -> RepoResult<Option<Writer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WRITER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_writer_row(row)?));
        }

        Ok(None)
    }

    fn list_writers(&self, page: &ListPage) -> RepoResult<Vec<Writer>> {
        let mut sql = format!("{WRITER_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_page_clause(&mut sql, &mut bind_values, page);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut writers = Vec::new();

        while let Some(row) = rows.next()? {
            writers.push(parse_writer_row(row)?);
        }

        Ok(writers)
    }

    fn search_writers(&self, query: &str, page: &ListPage) -> RepoResult<Vec<Writer>> {
        // Similarity is computed in-process over the full writer set; the
        // table is the candidate index.
        let candidates = self.list_writers(&ListPage::default())?;
        let ranked = rank_writers(candidates, query);

        let hits = ranked.into_iter().skip(page.offset as usize);
        Ok(match page.limit {
            Some(limit) => hits.take(limit as usize).map(|hit| hit.writer).collect(),
            None => hits.map(|hit| hit.writer).collect(),
        })
    }

    fn update_writer(&self, writer: &Writer) -> RepoResult<()> {
        writer.validate()?;

        let changed = self.conn.execute(
            "UPDATE writers
             SET
                name = ?1,
                birth_year = ?2,
                death_year = ?3,
                bio = ?4
             WHERE id = ?5;",
            params![
                writer.name.as_str(),
                writer.birth_year,
                writer.death_year,
                writer.bio.as_deref(),
                writer.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::WriterNotFound(writer.id));
        }

        Ok(())
    }

    fn delete_writer(&self, id: WriterId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM writers WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::WriterNotFound(id));
        }

        Ok(())
    }
}

fn parse_writer_row(row: &Row<'_>) -> RepoResult<Writer> {
    Ok(Writer {
        id: row.get("id")?,
        name: row.get("name")?,
        birth_year: row.get("birth_year")?,
        death_year: row.get("death_year")?,
        bio: row.get("bio")?,
    })
}
