use litgraph_core::db::{open_db, open_db_in_memory};
use litgraph_core::{
    ListPage, NewWork, NewWriter, Opinion, OpinionRepository, OpinionService, RepoError,
    ServiceError, SqliteOpinionRepository, SqliteWorkRepository, SqliteWriterRepository,
    ValidationError, WorkRepository, WorkService, WriterId, WriterRepository, WorkId,
};
use rusqlite::Connection;
use std::path::Path;

#[test]
fn another_writer_can_record_an_opinion() {
    let conn = open_db_in_memory().unwrap();
    let (author_id, critic_id, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    service
        .create_opinion(&Opinion::new(
            critic_id,
            work_id,
            true,
            "it is a truth universally acknowledged",
            "Village Review",
        ))
        .unwrap();

    let loaded = service.get_opinion(critic_id, work_id).unwrap();
    assert!(loaded.sentiment);
    assert_eq!(loaded.work_id, work_id);
    assert_ne!(loaded.writer_id, author_id);
}

#[test]
fn author_cannot_record_an_opinion_about_their_own_work() {
    let conn = open_db_in_memory().unwrap();
    let (author_id, _, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    let err = service
        .create_opinion(&Opinion::new(
            author_id,
            work_id,
            true,
            "my finest pages",
            "Private Diary",
        ))
        .unwrap_err();

    match err {
        ServiceError::SelfOpinion { writer_id, work_id: rejected_work } => {
            assert_eq!(writer_id, author_id);
            assert_eq!(rejected_work, work_id);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_opinions(&ListPage::default()).unwrap().is_empty());
}

#[test]
fn storage_guard_rejects_self_opinion_without_service_checks() {
    let conn = open_db_in_memory().unwrap();
    let (author_id, _, work_id) = seed_author_critic_work(&conn);
    let repo = SqliteOpinionRepository::try_new(&conn).unwrap();

    // Straight to the repository: the trigger alone must hold the invariant.
    let err = repo
        .create_opinion(&Opinion::new(
            author_id,
            work_id,
            true,
            "unmatched prose",
            "Personal",
        ))
        .unwrap_err();
    assert!(matches!(err, RepoError::SelfOpinion { .. }));
}

#[test]
fn storage_guard_holds_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guard.db");

    let seed_conn = open_db(&path).unwrap();
    let (author_id, _, work_id) = seed_author_critic_work(&seed_conn);
    drop(seed_conn);

    let other_conn = open_db(&path).unwrap();
    let repo = SqliteOpinionRepository::try_new(&other_conn).unwrap();
    let err = repo
        .create_opinion(&Opinion::new(author_id, work_id, true, "mine", "Diary"))
        .unwrap_err();
    assert!(matches!(err, RepoError::SelfOpinion { .. }));
}

#[test]
fn concurrent_self_opinion_attempts_both_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");

    let seed_conn = open_db(&path).unwrap();
    let (author_id, _, work_id) = seed_author_critic_work(&seed_conn);
    drop(seed_conn);

    let results = std::thread::scope(|scope| {
        let handles = [
            scope.spawn(|| attempt_opinion(&path, author_id, work_id)),
            scope.spawn(|| attempt_opinion(&path, author_id, work_id)),
        ];
        handles.map(|handle| handle.join().unwrap())
    });

    for result in results {
        assert!(matches!(result, Err(RepoError::SelfOpinion { .. })));
    }

    let check_conn = open_db(&path).unwrap();
    let repo = SqliteOpinionRepository::try_new(&check_conn).unwrap();
    assert!(repo.list_opinions(&ListPage::default()).unwrap().is_empty());
}

#[test]
fn concurrent_duplicate_creates_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.db");

    let seed_conn = open_db(&path).unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&seed_conn);
    drop(seed_conn);

    let results = std::thread::scope(|scope| {
        let handles = [
            scope.spawn(|| attempt_opinion(&path, critic_id, work_id)),
            scope.spawn(|| attempt_opinion(&path, critic_id, work_id)),
        ];
        handles.map(|handle| handle.join().unwrap())
    });

    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);

    let check_conn = open_db(&path).unwrap();
    let repo = SqliteOpinionRepository::try_new(&check_conn).unwrap();
    assert_eq!(repo.list_opinions(&ListPage::default()).unwrap().len(), 1);
}

#[test]
fn duplicate_composite_key_fails_deterministically() {
    let conn = open_db_in_memory().unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&conn);
    let repo = SqliteOpinionRepository::try_new(&conn).unwrap();

    let opinion = Opinion::new(critic_id, work_id, true, "fine", "Gazette");
    repo.create_opinion(&opinion).unwrap();

    let err = repo.create_opinion(&opinion).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(repo.list_opinions(&ListPage::default()).unwrap().len(), 1);
}

#[test]
fn missing_work_is_reported_before_missing_writer() {
    let conn = open_db_in_memory().unwrap();
    let service = opinion_service(&conn);

    // Neither id resolves; the work lookup comes first.
    let err = service
        .create_opinion(&Opinion::new(999, 77, true, "quote", "source"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::WorkNotFound(77)));
}

#[test]
fn missing_writer_is_reported_when_work_exists() {
    let conn = open_db_in_memory().unwrap();
    let (_, _, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    let err = service
        .create_opinion(&Opinion::new(999, work_id, true, "quote", "source"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::WriterNotFound(999)));
}

#[test]
fn empty_quote_is_rejected_before_empty_source() {
    let conn = open_db_in_memory().unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    let err = service
        .create_opinion(&Opinion::new(critic_id, work_id, true, "", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyQuote)
    ));
}

#[test]
fn update_revalidates_after_author_reassignment() {
    let conn = open_db_in_memory().unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&conn);
    let opinions = opinion_service(&conn);
    let works = WorkService::new(
        SqliteWorkRepository::try_new(&conn).unwrap(),
        SqliteWriterRepository::try_new(&conn).unwrap(),
    );

    let mut opinion = Opinion::new(critic_id, work_id, true, "remarkable", "Gazette");
    opinions.create_opinion(&opinion).unwrap();

    // The work changes hands to the very writer who holds the opinion.
    works
        .update_work(work_id, &NewWork::new("Pride and Prejudice", critic_id))
        .unwrap();

    opinion.quote = "remarkable still".to_string();
    let err = opinions.update_opinion(&opinion).unwrap_err();
    assert!(matches!(err, ServiceError::SelfOpinion { .. }));

    // The storage trigger reaches the same verdict without the service.
    let repo = SqliteOpinionRepository::try_new(&conn).unwrap();
    let err = repo.update_opinion(&opinion).unwrap_err();
    assert!(matches!(err, RepoError::SelfOpinion { .. }));
}

#[test]
fn update_missing_opinion_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    let err = service
        .update_opinion(&Opinion::new(critic_id, work_id, true, "quote", "source"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::OpinionNotFound { .. }));
}

#[test]
fn update_replaces_mutable_fields() {
    let conn = open_db_in_memory().unwrap();
    let (_, critic_id, work_id) = seed_author_critic_work(&conn);
    let service = opinion_service(&conn);

    let mut opinion = Opinion::new(critic_id, work_id, true, "fine", "Gazette");
    service.create_opinion(&opinion).unwrap();

    opinion.sentiment = false;
    opinion.quote = "on reflection, tedious".to_string();
    opinion.page = Some("12".to_string());
    opinion.statement_year = Some(1848);
    service.update_opinion(&opinion).unwrap();

    let loaded = service.get_opinion(critic_id, work_id).unwrap();
    assert_eq!(loaded, opinion);
}

#[test]
fn lookups_by_writer_and_by_work() {
    let conn = open_db_in_memory().unwrap();
    let writers = SqliteWriterRepository::try_new(&conn).unwrap();
    let works = SqliteWorkRepository::try_new(&conn).unwrap();
    let service = opinion_service(&conn);

    let austen = writers
        .create_writer(&NewWriter::new("Jane Austen", 1775))
        .unwrap();
    let bronte = writers
        .create_writer(&NewWriter::new("Charlotte Bronte", 1816))
        .unwrap();
    let twain = writers
        .create_writer(&NewWriter::new("Mark Twain", 1835))
        .unwrap();
    let emma = works
        .create_work(&NewWork::new("Emma", austen.id))
        .unwrap();
    let jane_eyre = works
        .create_work(&NewWork::new("Jane Eyre", bronte.id))
        .unwrap();

    service
        .create_opinion(&Opinion::new(bronte.id, emma.id, false, "b-on-emma", "L"))
        .unwrap();
    service
        .create_opinion(&Opinion::new(twain.id, emma.id, false, "t-on-emma", "E"))
        .unwrap();
    service
        .create_opinion(&Opinion::new(twain.id, jane_eyre.id, true, "t-on-je", "E"))
        .unwrap();

    let by_twain = service.get_opinions_by_writer(twain.id).unwrap();
    assert_eq!(by_twain.len(), 2);
    assert!(by_twain.iter().all(|opinion| opinion.writer_id == twain.id));

    let on_emma = service.get_opinions_by_work(emma.id).unwrap();
    assert_eq!(on_emma.len(), 2);
    assert!(on_emma.iter().all(|opinion| opinion.work_id == emma.id));

    service.delete_opinion(twain.id, emma.id).unwrap();
    assert_eq!(service.get_opinions_by_work(emma.id).unwrap().len(), 1);
    assert!(matches!(
        service.get_opinion(twain.id, emma.id).unwrap_err(),
        ServiceError::OpinionNotFound { .. }
    ));
}

#[test]
fn repository_refuses_connection_missing_the_guard_trigger() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TRIGGER opinions_reject_self_insert;")
        .unwrap();

    let result = SqliteOpinionRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTrigger("opinions_reject_self_insert"))
    ));
}

fn seed_author_critic_work(conn: &Connection) -> (WriterId, WriterId, WorkId) {
    let writers = SqliteWriterRepository::try_new(conn).unwrap();
    let works = SqliteWorkRepository::try_new(conn).unwrap();

    let author = writers
        .create_writer(&NewWriter::new("Jane Austen", 1775))
        .unwrap();
    let critic = writers
        .create_writer(&NewWriter::new("Charlotte Bronte", 1816))
        .unwrap();
    let work = works
        .create_work(&NewWork::new("Pride and Prejudice", author.id))
        .unwrap();

    (author.id, critic.id, work.id)
}

fn opinion_service(
    conn: &Connection,
) -> OpinionService<
    SqliteOpinionRepository<'_>,
    SqliteWriterRepository<'_>,
    SqliteWorkRepository<'_>,
> {
    OpinionService::new(
        SqliteOpinionRepository::try_new(conn).unwrap(),
        SqliteWriterRepository::try_new(conn).unwrap(),
        SqliteWorkRepository::try_new(conn).unwrap(),
    )
}

fn attempt_opinion(path: &Path, writer_id: WriterId, work_id: WorkId) -> Result<(), RepoError> {
    let conn = open_db(path).expect("race worker should open the database");
    let repo = SqliteOpinionRepository::try_new(&conn)?;
    repo.create_opinion(&Opinion::new(
        writer_id,
        work_id,
        true,
        "simultaneous",
        "Wire",
    ))
}
