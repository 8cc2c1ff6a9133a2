use crate::validate::FieldErrors;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// The two record kinds the API serves. Drives the fixed 404 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Destination,
    Review,
}

impl Resource {
    pub fn not_found_message(self) -> String {
        format!("{self} not found.")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Destination => write!(f, "Destination"),
            Resource::Review => write!(f, "Review"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(stopover::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(stopover::config))]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    #[diagnostic(code(stopover::db))]
    Db(#[from] sea_orm::DbErr),

    #[error("Invalid multipart body: {0}")]
    #[diagnostic(code(stopover::multipart))]
    Multipart(String),

    #[error("Validation failed: {0}")]
    #[diagnostic(code(stopover::validation))]
    Validation(FieldErrors),

    #[error("{0} not found")]
    #[diagnostic(code(stopover::not_found))]
    NotFound(Resource),
}
