mod common;

use sea_orm::{ConnectionTrait, Statement};

use common::{at, engine_with_db, signed_in};
use engine::{EngineError, EntryKind, MemberFilter, Money, NewMemberCmd, RecordCmd};

#[tokio::test]
async fn record_round_trips_through_list_all() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    let id = engine
        .record(
            &session,
            RecordCmd::expense(Money::new(12_50))
                .category("  Food ")
                .description(" lunch ")
                .occurred_at(at(5, 3, 2024, 12, 30)),
        )
        .await
        .unwrap();

    let entries = engine.list_all(&session).await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.user_id, session.user_id());
    assert_eq!(entry.kind, EntryKind::Expense);
    assert_eq!(entry.amount, Money::new(12_50));
    assert_eq!(entry.category.as_deref(), Some("  Food "));
    assert_eq!(entry.description.as_deref(), Some(" lunch "));
    assert_eq!(entry.category_label(), "Food");
    assert_eq!(entry.date, "05.03.2024 12:30");
    assert_eq!(entry.member_id, None);
    assert_eq!(
        entry.occurred_on(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
    );
}

#[tokio::test]
async fn category_and_description_are_stored_verbatim() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    engine
        .record(
            &session,
            RecordCmd::expense(Money::new(300))
                .category("Cafe\u{301} ")
                .description("  two spaces "),
        )
        .await
        .unwrap();
    engine
        .record(
            &session,
            RecordCmd::expense(Money::new(200))
                .category("Caf\u{e9}")
                .description(""),
        )
        .await
        .unwrap();

    let entries = engine.list_all(&session).await.unwrap();
    assert_eq!(entries[1].category.as_deref(), Some("Cafe\u{301} "));
    assert_eq!(entries[1].description.as_deref(), Some("  two spaces "));
    assert_eq!(entries[0].category.as_deref(), Some("Caf\u{e9}"));
    assert_eq!(entries[0].description.as_deref(), Some(""));

    // Both spellings group under one label.
    let totals = engine
        .category_totals(&session, EntryKind::Expense, MemberFilter::All)
        .await
        .unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals["Caf\u{e9}"], Money::new(500));
}

#[tokio::test]
async fn record_defaults_category_and_timestamp() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    engine
        .record(&session, RecordCmd::expense(Money::from_major(1)).category(" "))
        .await
        .unwrap();

    let entry = &engine.list_all(&session).await.unwrap()[0];
    assert_eq!(entry.category.as_deref(), Some("Other"));
    assert_eq!(entry.category_label(), "Other");
    assert!(entry.description.is_none());
    assert!(entry.occurred_on().is_some());
}

#[tokio::test]
async fn record_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    for amount in [Money::ZERO, Money::new(-100)] {
        let err = engine
            .record(&session, RecordCmd::income(amount))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert!(engine.list_all(&session).await.unwrap().is_empty());
    assert_eq!(engine.get_balance(&session).await.unwrap(), Money::ZERO);
}

#[tokio::test]
async fn owner_income_credits_the_stored_balance_and_expense_does_not() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;
    let kid = engine
        .add_member(&session, NewMemberCmd::new("Kid"))
        .await
        .unwrap();

    engine
        .record(&session, RecordCmd::income(Money::from_major(100)))
        .await
        .unwrap();
    assert_eq!(
        engine.get_balance(&session).await.unwrap(),
        Money::from_major(100)
    );

    engine
        .record(&session, RecordCmd::expense(Money::from_major(40)))
        .await
        .unwrap();
    assert_eq!(
        engine.get_balance(&session).await.unwrap(),
        Money::from_major(100)
    );

    engine
        .record(&session, RecordCmd::income(Money::from_major(7)).member(kid))
        .await
        .unwrap();
    assert_eq!(
        engine.get_balance(&session).await.unwrap(),
        Money::from_major(100)
    );
}

#[tokio::test]
async fn list_all_is_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    let mut ids = Vec::new();
    for minor in [100, 200, 300] {
        ids.push(
            engine
                .record(&session, RecordCmd::expense(Money::new(minor)))
                .await
                .unwrap(),
        );
    }
    ids.reverse();

    let listed: Vec<i64> = engine
        .list_all(&session)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn pages_concatenate_to_list_all() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;
    for minor in 1..=7 {
        engine
            .record(&session, RecordCmd::expense(Money::new(minor)))
            .await
            .unwrap();
    }

    let mut paged = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let (page, next) = engine
            .list_page(&session, 3, cursor.as_deref())
            .await
            .unwrap();
        assert!(page.len() <= 3);
        paged.extend(page);
        pages += 1;
        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(paged, engine.list_all(&session).await.unwrap());
}

#[tokio::test]
async fn malformed_cursor_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    let err = engine
        .list_page(&session, 10, Some("not a cursor"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));

    let err = engine.list_page(&session, 0, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn set_balance_and_goal_overwrite() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    engine
        .record(&session, RecordCmd::income(Money::from_major(10)))
        .await
        .unwrap();
    engine
        .set_balance(&session, Money::from_major(-5))
        .await
        .unwrap();
    assert_eq!(
        engine.get_balance(&session).await.unwrap(),
        Money::from_major(-5)
    );

    engine.set_goal(&session, Money::from_major(1000)).await.unwrap();
    engine.set_goal(&session, Money::from_major(200)).await.unwrap();
    assert_eq!(
        engine.get_goal(&session).await.unwrap(),
        Money::from_major(200)
    );
}

#[tokio::test]
async fn amounts_persist_as_cents_under_the_ledger_column_names() {
    let (engine, db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    engine
        .record(&session, RecordCmd::expense(Money::new(12_50)).category("Food"))
        .await
        .unwrap();
    engine
        .set_balance(&session, Money::from_major(7))
        .await
        .unwrap();
    engine.set_goal(&session, Money::from_major(300)).await.unwrap();

    let backend = db.get_database_backend();
    let history = db
        .query_one(Statement::from_string(
            backend,
            "SELECT type, amount FROM history",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.try_get::<String>("", "type").unwrap(), "expense");
    assert_eq!(history.try_get::<i64>("", "amount").unwrap(), 1250);

    let balance = db
        .query_one(Statement::from_string(backend, "SELECT amount FROM balance"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.try_get::<i64>("", "amount").unwrap(), 700);

    let goal = db
        .query_one(Statement::from_string(backend, "SELECT target FROM goals"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(goal.try_get::<i64>("", "target").unwrap(), 30_000);
}

#[tokio::test]
async fn goal_progress_follows_the_stored_balance() {
    let (engine, _db) = engine_with_db().await;
    let session = signed_in(&engine, "alice").await;

    let progress = engine.goal_progress(&session).await.unwrap();
    assert_eq!(progress.ratio, 0.0);

    engine.set_goal(&session, Money::from_major(200)).await.unwrap();
    engine
        .record(&session, RecordCmd::income(Money::from_major(50)))
        .await
        .unwrap();
    let progress = engine.goal_progress(&session).await.unwrap();
    assert_eq!(progress.balance, Money::from_major(50));
    assert_eq!(progress.target, Money::from_major(200));
    assert!((progress.ratio - 0.25).abs() < f64::EPSILON);

    engine
        .set_balance(&session, Money::from_major(999))
        .await
        .unwrap();
    let progress = engine.goal_progress(&session).await.unwrap();
    assert!((progress.ratio - 1.0).abs() < f64::EPSILON);
}
