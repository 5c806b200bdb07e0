use crate::domain::{DomainError, MediaItem, Page};
use tokio_util::sync::CancellationToken;

use super::aggregate::AlbumAggregator;

pub const MAX_PAGE_SIZE: usize = 500;

pub struct ListMediaUseCase {
    aggregator: AlbumAggregator,
}

impl ListMediaUseCase {
    pub fn new(aggregator: AlbumAggregator) -> Self {
        Self { aggregator }
    }

    /// One page of a bucket's media. `page` is 1-based.
    pub async fn execute(&self, group_id: &str, page: usize, page_size: usize) -> Result<Page<MediaItem>, DomainError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(page_size);

        let snapshot = self
            .aggregator
            .list_media(group_id, &CancellationToken::new())
            .await?;

        let total = snapshot.items.len();
        let items = snapshot.items.into_iter().skip(offset).take(page_size).collect();

        Ok(Page {
            items,
            page,
            page_size,
            total,
            status: snapshot.status,
            retryable: snapshot.retryable,
        })
    }
}
