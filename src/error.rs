//! Error types shared across the crate.

use std::num::ParseIntError;

use thiserror::Error;

use crate::service::{email::MailError, uploads::UploadError};

/// Raised while turning the environment into `Settings`.
///
/// Integer fields are the only fallible ones: strings are taken as-is and
/// flags fall back to `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid integer literal for {key}: {value:?}")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ConfigError {
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::InvalidInteger { key, .. } => key,
        }
    }
}

/// Startup failures surfaced by the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
