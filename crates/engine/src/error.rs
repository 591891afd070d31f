//! The module contains the errors the engine can return.
//!
//! Every variant maps onto one [`ErrorKind`], the coarse taxonomy hosts use
//! to decide whether to show a message, ask for credentials again or retry.
//! [`Database`] is the storage failure kind: a write that fails with it has
//! been rolled back entirely.
//!
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" already present!")]
    AlreadyExists(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    #[error("Not owner: {0}")]
    NotOwner(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Password hash failure: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyExists,
    InvalidCredentials,
    NotAuthenticated,
    LimitExceeded,
    NotOwner,
    InvalidAmount,
    InvalidInput,
    StorageFailure,
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::LimitExceeded(_) => ErrorKind::LimitExceeded,
            Self::NotOwner(_) => ErrorKind::NotOwner,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::InvalidInput(_) | Self::InvalidCursor(_) => ErrorKind::InvalidInput,
            Self::PasswordHash(_) | Self::Database(_) => ErrorKind::StorageFailure,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::NotAuthenticated, Self::NotAuthenticated) => true,
            (Self::LimitExceeded(a), Self::LimitExceeded(b)) => a == b,
            (Self::NotOwner(a), Self::NotOwner(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
