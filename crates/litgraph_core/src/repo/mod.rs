//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must validate records before SQL mutations.
//! - Repository constructors probe the connection for migration version and
//!   required schema objects instead of failing mid-query later.
//! - The storage-level self-opinion abort is surfaced as `SelfOpinion`,
//!   never as a generic database failure.

use crate::db::DbError;
use crate::model::work::WorkId;
use crate::model::writer::WriterId;
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod opinion_repo;
pub mod work_repo;
pub mod writer_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    WriterNotFound(WriterId),
    WorkNotFound(WorkId),
    OpinionNotFound {
        writer_id: WriterId,
        work_id: WorkId,
    },
    /// The storage-level guard rejected a write that would record a writer's
    /// opinion about their own work.
    SelfOpinion {
        writer_id: WriterId,
        work_id: WorkId,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    MissingRequiredTrigger(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::WriterNotFound(id) => write!(f, "writer not found: {id}"),
            Self::WorkNotFound(id) => write!(f, "work not found: {id}"),
            Self::OpinionNotFound { writer_id, work_id } => {
                write!(f, "opinion not found: writer {writer_id}, work {work_id}")
            }
            Self::SelfOpinion { writer_id, work_id } => write!(
                f,
                "writer cannot express opinion about their own work (writer {writer_id}, work {work_id})"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::MissingRequiredTrigger(trigger) => {
                write!(f, "required trigger `{trigger}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination options for list-style queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Maximum rows to return. `None` returns everything.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl ListPage {
    pub fn new(limit: Option<u32>, offset: u32) -> Self {
        Self { limit, offset }
    }
}

pub(crate) fn push_page_clause(
    sql: &mut String,
    bind_values: &mut Vec<rusqlite::types::Value>,
    page: &ListPage,
) {
    use rusqlite::types::Value;

    if let Some(limit) = page.limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if page.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(page.offset)));
        }
    } else if page.offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(page.offset)));
    }
}

pub(crate) fn ensure_connection_migrated(conn: &Connection) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }
    Ok(())
}

pub(crate) fn ensure_table_with_columns(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !schema_object_exists(conn, "table", table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

pub(crate) fn ensure_trigger(conn: &Connection, trigger: &'static str) -> RepoResult<()> {
    if !schema_object_exists(conn, "trigger", trigger)? {
        return Err(RepoError::MissingRequiredTrigger(trigger));
    }
    Ok(())
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = ?1 AND name = ?2
        );",
        [kind, name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
