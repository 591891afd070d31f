use std::process::ExitCode;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use crate::{cli::Cli, error::Result, settings::Settings};

mod cli;
mod commands;
mod error;
mod export;
mod prompt;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hearthbook={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_database(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    commands::run(&engine, &settings, cli.command).await
}

async fn connect_database(config: &settings::Database) -> Result<DatabaseConnection> {
    let url = config.url();
    tracing::debug!(%url, "opening database");

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
