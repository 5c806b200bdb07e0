use crate::domain::{Album, DomainError, Snapshot};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::aggregate::AlbumAggregator;

pub struct ListAlbumsUseCase {
    aggregator: AlbumAggregator,
    // Parent of every scan started through this use case. Replaced on refresh.
    generation: Mutex<CancellationToken>,
}

impl ListAlbumsUseCase {
    pub fn new(aggregator: AlbumAggregator) -> Self {
        Self {
            aggregator,
            generation: Mutex::new(CancellationToken::new()),
        }
    }

    pub async fn execute(&self) -> Result<Snapshot<Album>, DomainError> {
        let token = self.generation.lock().unwrap().child_token();
        self.aggregator.aggregate_albums(&token).await
    }

    /// Rescan, cancelling every scan still running from an earlier call.
    pub async fn refresh(&self) -> Result<Snapshot<Album>, DomainError> {
        let token = {
            let mut generation = self.generation.lock().unwrap();
            generation.cancel();
            *generation = CancellationToken::new();
            generation.child_token()
        };
        info!("Refreshing albums");
        self.aggregator.aggregate_albums(&token).await
    }
}
