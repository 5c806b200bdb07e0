use crate::domain::{DomainError, MediaKind};
use tracing::warn;

/// Deleting media from the device index is not supported.
#[derive(Default)]
pub struct DeleteMediaUseCase;

impl DeleteMediaUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(&self, kind: MediaKind, id: i64) -> Result<(), DomainError> {
        warn!(%kind, id, "Rejected delete request");
        Err(DomainError::Unsupported("media deletion"))
    }
}
