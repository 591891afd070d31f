use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Engine(#[from] engine::EngineError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Engine(err) => match err.kind() {
                engine::ErrorKind::InvalidCredentials | engine::ErrorKind::NotAuthenticated => 3,
                engine::ErrorKind::StorageFailure => 4,
                _ => 2,
            },
            Self::Database(_) => 4,
            _ => 1,
        }
    }
}
