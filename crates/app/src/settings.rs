//! Settings for the `hearthbook` binary.
//!
//! Read from `hearthbook.toml` (or the file passed with `--config`) and
//! overridden by `HEARTHBOOK_*` environment variables, e.g.
//! `HEARTHBOOK_APP__LEVEL=debug`.
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "hearthbook";
const DEFAULT_DATABASE_PATH: &str = "hearthbook.db";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// Used when `--username` is omitted.
    pub username: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            username: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite(DEFAULT_DATABASE_PATH.to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("HEARTHBOOK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
