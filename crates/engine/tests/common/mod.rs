#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, Session};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Registers `username` with a fixed password and logs in.
pub async fn signed_in(engine: &Engine, username: &str) -> Session {
    engine.register(username, "password").await.unwrap();
    engine.login(username, "password").await.unwrap()
}

pub fn at(day: u32, month: u32, year: i32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
