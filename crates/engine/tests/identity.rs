mod common;

use sea_orm::{ConnectionTrait, Statement};

use common::{engine_with_db, signed_in};
use engine::{EngineError, ErrorKind, Money, RecordCmd};

#[tokio::test]
async fn register_seeds_balance_goal_and_self_member() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    assert_eq!(engine.get_balance(&session).await.unwrap(), Money::ZERO);
    assert_eq!(engine.get_goal(&session).await.unwrap(), Money::ZERO);

    let members = engine.list_members(&session).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Self");
    assert_eq!(members[0].role.as_deref(), Some("Owner"));
    assert_eq!(members[0].color, "#6C5CE7");
    assert!(members[0].avatar.is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    engine.register("alice", "one").await.unwrap();

    let err = engine.register("alice", "two").await.unwrap_err();
    assert_eq!(err, EngineError::AlreadyExists("alice".to_string()));

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT COUNT(*) AS n FROM users",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<i64>("", "n").unwrap(), 1);

    // The first password still works.
    engine.login("alice", "one").await.unwrap();
}

#[tokio::test]
async fn register_rejects_blank_credentials() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.register("   ", "pw").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    let err = engine.register("bob", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn usernames_are_stored_and_matched_exactly() {
    let (engine, _db) = engine_with_db().await;
    engine.register(" alice", "pw").await.unwrap();

    assert_eq!(
        engine.login("alice", "pw").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    assert_eq!(
        engine.login(" Alice", "pw").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    let session = engine.login(" alice", "pw").await.unwrap();
    assert_eq!(session.username(), " alice");

    // Differently spelled names are different accounts.
    engine.register("alice", "other").await.unwrap();
    engine.register("Alice", "other").await.unwrap();
    engine.login("alice", "other").await.unwrap();
}

#[tokio::test]
async fn failed_registration_leaves_no_rows_behind() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "CREATE TRIGGER goals_unavailable BEFORE INSERT ON goals \
         BEGIN SELECT RAISE(ABORT, 'goals unavailable'); END",
    ))
    .await
    .unwrap();

    let err = engine.register("alice", "pw").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);

    for table in ["users", "balance", "goals", "family_members"] {
        let row = db
            .query_one(Statement::from_string(
                backend,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i64>("", "n").unwrap(), 0, "{table} not empty");
    }
    assert_eq!(
        engine.login("alice", "pw").await.unwrap_err(),
        EngineError::InvalidCredentials
    );

    db.execute(Statement::from_string(
        backend,
        "DROP TRIGGER goals_unavailable",
    ))
    .await
    .unwrap();
    engine.register("alice", "pw").await.unwrap();
}

#[tokio::test]
async fn login_succeeds_only_with_matching_credentials() {
    let (engine, _db) = engine_with_db().await;
    engine.register("alice", "s3cret").await.unwrap();

    assert_eq!(
        engine.login("alice", "wrong").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    assert_eq!(
        engine.login("nobody", "s3cret").await.unwrap_err(),
        EngineError::InvalidCredentials
    );

    let session = engine.login("alice", "s3cret").await.unwrap();
    assert_eq!(session.username(), "alice");
}

#[tokio::test]
async fn passwords_are_not_stored_in_plaintext() {
    let (engine, db) = engine_with_db().await;
    engine.register("alice", "s3cret").await.unwrap();

    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT password_hash FROM users WHERE username = 'alice'",
        ))
        .await
        .unwrap()
        .unwrap();
    let stored: String = row.try_get("", "password_hash").unwrap();
    assert_ne!(stored, "s3cret");
    assert!(stored.starts_with("$argon2"));
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    engine.logout(&session).await.unwrap();

    assert_eq!(
        engine.get_balance(&session).await.unwrap_err(),
        EngineError::NotAuthenticated
    );
    assert_eq!(
        engine
            .record(&session, RecordCmd::income(Money::from_major(1)))
            .await
            .unwrap_err(),
        EngineError::NotAuthenticated
    );
    assert_eq!(
        engine.logout(&session).await.unwrap_err(),
        EngineError::NotAuthenticated
    );
}

#[tokio::test]
async fn sessions_are_scoped_to_their_user() {
    let (engine, _db) = engine_with_db().await;
    let alice = signed_in(&engine, "alice").await;
    let bob = signed_in(&engine, "bob").await;

    engine
        .record(&alice, RecordCmd::income(Money::from_major(10)))
        .await
        .unwrap();

    assert_eq!(engine.list_all(&alice).await.unwrap().len(), 1);
    assert!(engine.list_all(&bob).await.unwrap().is_empty());
    assert_eq!(engine.get_balance(&bob).await.unwrap(), Money::ZERO);
}

#[tokio::test]
async fn login_backfills_missing_account_rows() {
    let (engine, db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;
    let user_id = session.user_id();
    engine.logout(&session).await.unwrap();

    let backend = db.get_database_backend();
    for table in ["balance", "goals"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            format!("DELETE FROM {table} WHERE user_id = ?"),
            vec![user_id.into()],
        ))
        .await
        .unwrap();
    }
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM family_members WHERE owner_id = ?",
        vec![user_id.into()],
    ))
    .await
    .unwrap();

    let session = engine.login("alice", "password").await.unwrap();
    assert_eq!(engine.get_balance(&session).await.unwrap(), Money::ZERO);
    assert_eq!(engine.get_goal(&session).await.unwrap(), Money::ZERO);
    let members = engine.list_members(&session).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Self");

    // A second login finds nothing to repair.
    let again = engine.login("alice", "password").await.unwrap();
    assert_eq!(engine.list_members(&again).await.unwrap().len(), 1);
}

#[tokio::test]
async fn legacy_digest_is_upgraded_on_login() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    // sha256("secret")
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password_hash) VALUES (?, ?)",
        vec![
            "legacy".into(),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b".into(),
        ],
    ))
    .await
    .unwrap();

    assert_eq!(
        engine.login("legacy", "Secret").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    let session = engine.login("legacy", "secret").await.unwrap();
    assert_eq!(engine.list_members(&session).await.unwrap().len(), 1);

    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT password_hash FROM users WHERE username = 'legacy'",
        ))
        .await
        .unwrap()
        .unwrap();
    let stored: String = row.try_get("", "password_hash").unwrap();
    assert!(stored.starts_with("$argon2"));

    engine.login("legacy", "secret").await.unwrap();
}

#[tokio::test]
async fn delete_account_removes_owned_rows_and_sessions() {
    let (engine, db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;
    let other = engine.login("alice", "password").await.unwrap();
    engine
        .record(&session, RecordCmd::expense(Money::from_major(3)))
        .await
        .unwrap();

    engine.delete_account(&session).await.unwrap();

    assert_eq!(
        engine.list_all(&other).await.unwrap_err(),
        EngineError::NotAuthenticated
    );
    assert_eq!(
        engine.login("alice", "password").await.unwrap_err(),
        EngineError::InvalidCredentials
    );

    let backend = db.get_database_backend();
    for table in ["users", "balance", "goals", "family_members", "history"] {
        let row = db
            .query_one(Statement::from_string(
                backend,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i64>("", "n").unwrap(), 0, "{table} not empty");
    }

    // The name is free again.
    engine.register("alice", "password").await.unwrap();
}
