use super::models::{MediaKind, RawMediaRecord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("{kind} source unavailable: {reason}")]
    SourceUnavailable { kind: MediaKind, reason: String },
    #[error("Malformed row: {0}")]
    MalformedRow(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

/// Row callback handed to [`MediaIndex::query_group`].
pub type RowVisitor<'a> = dyn FnMut(Result<RawMediaRecord, DomainError>) + 'a;

/// Read access to the device media index.
///
/// Implementations hold the underlying cursor only for the duration of the
/// call and must release it on every exit path. Rows come back newest first.
pub trait MediaIndex: Send + Sync {
    /// Stream every row of `kind`, optionally restricted to one bucket.
    ///
    /// A row that cannot be decoded is passed to `visit` as
    /// `Err(DomainError::MalformedRow)`; the query keeps going. An `Err`
    /// return means the whole query failed.
    fn query_group(
        &self,
        kind: MediaKind,
        group_id: Option<&str>,
        visit: &mut RowVisitor<'_>,
    ) -> Result<(), DomainError>;
}
