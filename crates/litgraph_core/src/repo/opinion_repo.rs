//! Opinion repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `opinions` keyed by `(writer_id, work_id)`.
//! - Surface the storage-level self-opinion abort as a typed error.
//!
//! # Invariants
//! - Write paths validate field rules before SQL mutations.
//! - The composite primary key makes duplicate creates fail deterministically.
//! - Every insert/update passes through the `opinions_reject_self_*`
//!   triggers; their abort maps to `RepoError::SelfOpinion`.
//!
//! # See also
//! - src/db/migrations/0002_self_opinion_guard.sql

use crate::model::opinion::Opinion;
use crate::model::work::WorkId;
use crate::model::writer::WriterId;
use crate::repo::{
    bool_to_int, ensure_connection_migrated, ensure_table_with_columns, ensure_trigger,
    push_page_clause, ListPage, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const OPINION_SELECT_SQL: &str = "SELECT
    writer_id,
    work_id,
    sentiment,
    quote,
    source,
    page,
    statement_year
FROM opinions";

// Must match the RAISE(ABORT, ...) text in 0002_self_opinion_guard.sql.
const SELF_OPINION_GUARD_TEXT: &str = "writer cannot express opinion about their own work";

/// Repository interface for opinion CRUD operations.
pub trait OpinionRepository {
    fn create_opinion(&self, opinion: &Opinion) -> RepoResult<()>;
    /// Gets one opinion by its composite key.
    fn get_opinion(&self, writer_id: WriterId, work_id: WorkId) -> RepoResult<Option<Opinion>>;
    /// Lists every opinion held by the given writer, in work-id order.
    fn get_opinions_by_writer(&self, writer_id: WriterId) -> RepoResult<Vec<Opinion>>;
    /// Lists every opinion about the given work, in writer-id order.
    fn get_opinions_by_work(&self, work_id: WorkId) -> RepoResult<Vec<Opinion>>;
    /// Lists opinions in stable composite-key order.
    fn list_opinions(&self, page: &ListPage) -> RepoResult<Vec<Opinion>>;
    fn update_opinion(&self, opinion: &Opinion) -> RepoResult<()>;
    fn delete_opinion(&self, writer_id: WriterId, work_id: WorkId) -> RepoResult<()>;
}

/// SQLite-backed opinion repository.
pub struct SqliteOpinionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOpinionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Refuses connections where the self-opinion triggers are absent, so a
    /// mis-migrated database cannot silently skip the authoritative guard.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_migrated(conn)?;
        ensure_table_with_columns(
            conn,
            "opinions",
            &[
                "writer_id",
                "work_id",
                "sentiment",
                "quote",
                "source",
                "page",
                "statement_year",
            ],
        )?;
        ensure_trigger(conn, "opinions_reject_self_insert")?;
        ensure_trigger(conn, "opinions_reject_self_update")?;
        Ok(Self { conn })
    }
}

impl OpinionRepository for SqliteOpinionRepository<'_> {
    fn create_opinion(&self, opinion: &Opinion) -> RepoResult<()> {
        opinion.validate()?;

        self.conn
            .execute(
                "INSERT INTO opinions (
                    writer_id,
                    work_id,
                    sentiment,
                    quote,
                    source,
                    page,
                    statement_year
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    opinion.writer_id,
                    opinion.work_id,
                    bool_to_int(opinion.sentiment),
                    opinion.quote.as_str(),
                    opinion.source.as_str(),
                    opinion.page.as_deref(),
                    opinion.statement_year,
                ],
            )
            .map_err(|err| map_opinion_write_error(err, opinion.writer_id, opinion.work_id))?;

        Ok(())
    }

    fn get_opinion(&self, writer_id: WriterId, work_id: WorkId) -> RepoResult<Option<Opinion>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OPINION_SELECT_SQL} WHERE writer_id = ?1 AND work_id = ?2;"
        ))?;

        let mut rows = stmt.query([writer_id, work_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_opinion_row(row)?));
        }

        Ok(None)
    }

    fn get_opinions_by_writer(&self, writer_id: WriterId) -> RepoResult<Vec<Opinion>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OPINION_SELECT_SQL} WHERE writer_id = ?1 ORDER BY work_id ASC;"
        ))?;

        let mut rows = stmt.query([writer_id])?;
        let mut opinions = Vec::new();
        while let Some(row) = rows.next()? {
            opinions.push(parse_opinion_row(row)?);
        }

        Ok(opinions)
    }

    fn get_opinions_by_work(&self, work_id: WorkId) -> RepoResult<Vec<Opinion>> {
        let mut stmt = self.conn.prepare(&format!(
            "{OPINION_SELECT_SQL} WHERE work_id = ?1 ORDER BY writer_id ASC;"
        ))?;

        let mut rows = stmt.query([work_id])?;
        let mut opinions = Vec::new();
        while let Some(row) = rows.next()? {
            opinions.push(parse_opinion_row(row)?);
        }

        Ok(opinions)
    }

    fn list_opinions(&self, page: &ListPage) -> RepoResult<Vec<Opinion>> {
        let mut sql = format!("{OPINION_SELECT_SQL} ORDER BY writer_id ASC, work_id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_page_clause(&mut sql, &mut bind_values, page);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut opinions = Vec::new();

        while let Some(row) = rows.next()? {
            opinions.push(parse_opinion_row(row)?);
        }

        Ok(opinions)
    }

    fn update_opinion(&self, opinion: &Opinion) -> RepoResult<()> {
        opinion.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE opinions
                 SET
                    sentiment = ?1,
                    quote = ?2,
                    source = ?3,
                    page = ?4,
                    statement_year = ?5
                 WHERE writer_id = ?6 AND work_id = ?7;",
                params![
                    bool_to_int(opinion.sentiment),
                    opinion.quote.as_str(),
                    opinion.source.as_str(),
                    opinion.page.as_deref(),
                    opinion.statement_year,
                    opinion.writer_id,
                    opinion.work_id,
                ],
            )
            .map_err(|err| map_opinion_write_error(err, opinion.writer_id, opinion.work_id))?;

        if changed == 0 {
            return Err(RepoError::OpinionNotFound {
                writer_id: opinion.writer_id,
                work_id: opinion.work_id,
            });
        }

        Ok(())
    }

    fn delete_opinion(&self, writer_id: WriterId, work_id: WorkId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM opinions WHERE writer_id = ?1 AND work_id = ?2;",
            [writer_id, work_id],
        )?;

        if changed == 0 {
            return Err(RepoError::OpinionNotFound { writer_id, work_id });
        }

        Ok(())
    }
}

fn map_opinion_write_error(err: rusqlite::Error, writer_id: WriterId, work_id: WorkId) -> RepoError {
    if is_self_opinion_violation(&err) {
        return RepoError::SelfOpinion { writer_id, work_id };
    }

    err.into()
}

fn is_self_opinion_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains(SELF_OPINION_GUARD_TEXT)
        }
        _ => false,
    }
}

fn parse_opinion_row(row: &Row<'_>) -> RepoResult<Opinion> {
    let sentiment = match row.get::<_, i64>("sentiment")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid sentiment value `{other}` in opinions.sentiment"
            )));
        }
    };

    Ok(Opinion {
        writer_id: row.get("writer_id")?,
        work_id: row.get("work_id")?,
        sentiment,
        quote: row.get("quote")?,
        source: row.get("source")?,
        page: row.get("page")?,
        statement_year: row.get("statement_year")?,
    })
}
