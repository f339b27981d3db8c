//! Core domain logic for litgraph: writers, their works, and third-party
//! opinions about those works.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::opinion::Opinion;
pub use model::work::{NewWork, Work, WorkId};
pub use model::writer::{NewWriter, Writer, WriterId};
pub use model::ValidationError;
pub use repo::opinion_repo::{OpinionRepository, SqliteOpinionRepository};
pub use repo::work_repo::{SqliteWorkRepository, WorkRepository};
pub use repo::writer_repo::{SqliteWriterRepository, WriterRepository};
pub use repo::{ListPage, RepoError, RepoResult};
pub use search::similarity::{trigram_similarity, SIMILARITY_THRESHOLD};
pub use search::writer_search::{rank_writers, RankedWriter};
pub use service::opinion_service::OpinionService;
pub use service::work_service::WorkService;
pub use service::writer_service::WriterService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
