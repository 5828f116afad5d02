//! All error types for the ascloc crate.
//!
//! These are returned from all fallible operations (spreadsheet parsing, merging,
//! snapshot writing, API calls, token signing, etc.).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API returned an error payload: {0}")]
    ApiErrors(String),

    #[error("file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("permission denied: unable to create `{}`", .0.display())]
    PermissionDenied(PathBuf),

    #[error("duplicate locale `{locale}` in {source_name}")]
    DuplicateLocale {
        locale: String,
        source_name: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Returns the HTTP status when the error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
