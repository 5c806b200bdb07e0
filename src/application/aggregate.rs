use crate::domain::{
    Album, AlbumKind, Cover, DomainError, MediaItem, MediaKind, ScanStatus, Snapshot,
};
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::classify::classify;
use super::ordering::{sort_albums, sort_media};
use super::project::MediaItemProjector;
use super::source::MediaRecordSource;

/// Stable album id for a bucket. Same key, same id, on every scan.
pub fn album_id(group_id: &str) -> i64 {
    let digest = Sha256::digest(group_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(prefix)
}

/// Mutable per-bucket state while a scan is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AlbumAccumulator {
    group_id: String,
    name: String,
    kind: AlbumKind,
    cover: Option<String>,
    images: u64,
    videos: u64,
}

impl AlbumAccumulator {
    fn seed(group_id: &str, name: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            name: name.to_string(),
            kind: classify(name),
            cover: None,
            images: 0,
            videos: 0,
        }
    }

    fn add(&mut self, kind: MediaKind, path: Option<&str>) {
        match kind {
            MediaKind::Image => self.images += 1,
            MediaKind::Video => self.videos += 1,
        }
        if self.cover.is_none() {
            self.cover = path.map(str::to_string);
        }
    }

    /// Fold another pass's view of the same bucket into this one. Name, kind
    /// and a cover that is already set are kept.
    fn absorb(&mut self, other: AlbumAccumulator) {
        self.images += other.images;
        self.videos += other.videos;
        if self.cover.is_none() {
            self.cover = other.cover;
        }
    }

    fn freeze(self) -> Album {
        Album {
            id: album_id(&self.group_id),
            cover: self.cover.map(Cover::Path).unwrap_or(Cover::Missing),
            media_count: self.images + self.videos,
            image_count: self.images,
            video_count: self.videos,
            kind: self.kind,
            name: self.name,
            group_id: self.group_id,
        }
    }
}

type Accumulators = HashMap<String, AlbumAccumulator>;

/// Builds album and per-album listings from the image and video passes.
#[derive(Clone)]
pub struct AlbumAggregator {
    source: MediaRecordSource,
    projector: MediaItemProjector,
}

impl AlbumAggregator {
    pub fn new(source: MediaRecordSource, projector: MediaItemProjector) -> Self {
        Self { source, projector }
    }

    pub async fn aggregate_albums(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Snapshot<Album>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let images = self.spawn_album_pass(MediaKind::Image);
        let videos = self.spawn_album_pass(MediaKind::Video);

        let (images, videos) = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Album scan superseded before merge");
                return Err(DomainError::Cancelled);
            }
            passes = async { tokio::join!(images, videos) } => passes,
        };

        let images = settle(MediaKind::Image, images);
        let videos = settle(MediaKind::Video, videos);
        let status = ScanStatus::from_passes(images.is_some(), videos.is_some());

        let mut merged = images.unwrap_or_default();
        let image_groups = merged.len();
        let video_groups = videos.as_ref().map_or(0, |v| v.len());
        for (group_id, acc) in videos.unwrap_or_default() {
            match merged.entry(group_id) {
                Entry::Occupied(mut existing) => existing.get_mut().absorb(acc),
                Entry::Vacant(slot) => {
                    slot.insert(acc);
                }
            }
        }

        let mut albums: Vec<Album> = merged.into_values().map(AlbumAccumulator::freeze).collect();
        sort_albums(&mut albums);

        info!(
            ?status,
            image_groups, video_groups, "Album scan finished: {} albums", albums.len()
        );
        Ok(Snapshot::new(albums, status))
    }

    /// Every image and video of one bucket, newest first.
    pub async fn list_media(
        &self,
        group_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Snapshot<MediaItem>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let source = self.source.clone();
        let projector = self.projector;
        let group = group_id.to_string();
        let listing = tokio::task::spawn_blocking(move || {
            let (records, status) = source.query_group(&group)?;
            let items: Vec<MediaItem> = records
                .into_iter()
                .filter_map(|(kind, record)| match projector.project(record, kind) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!(%kind, group = %group, "Skipping media record: {}", e);
                        None
                    }
                })
                .collect();
            Ok::<_, DomainError>((items, status))
        });

        let listing = tokio::select! {
            _ = cancel.cancelled() => return Err(DomainError::Cancelled),
            listing = listing => listing,
        };

        let (mut items, status) = match listing {
            Ok(Ok(listing)) => listing,
            Ok(Err(e)) => {
                warn!(group = group_id, "Bucket listing unavailable: {}", e);
                (Vec::new(), ScanStatus::Unavailable)
            }
            Err(e) => {
                warn!(group = group_id, "Bucket listing task did not complete: {}", e);
                (Vec::new(), ScanStatus::Unavailable)
            }
        };
        sort_media(&mut items);

        debug!(group = group_id, ?status, "Listed {} media items", items.len());
        Ok(Snapshot::new(items, status))
    }

    fn spawn_album_pass(
        &self,
        kind: MediaKind,
    ) -> tokio::task::JoinHandle<Result<Accumulators, DomainError>> {
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || fold_pass(&source, kind))
    }
}

/// One pass over the index, folded into per-bucket accumulators.
fn fold_pass(source: &MediaRecordSource, kind: MediaKind) -> Result<Accumulators, DomainError> {
    let mut groups: Accumulators = HashMap::new();
    let mut excluded = 0usize;

    source.scan(kind, None, |record| {
        let Some((group_id, name)) = record.grouping() else {
            excluded += 1;
            return;
        };
        groups
            .entry(group_id.to_string())
            .or_insert_with(|| AlbumAccumulator::seed(group_id, name))
            .add(kind, record.usable_path());
    })?;

    if excluded > 0 {
        debug!(%kind, excluded, "Records without a bucket were left out");
    }
    Ok(groups)
}

/// Collapse a pass result to `None` on any failure, logging why.
fn settle<T>(kind: MediaKind, joined: Result<Result<T, DomainError>, JoinError>) -> Option<T> {
    match joined {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(%kind, "Pass degraded to empty: {}", e);
            None
        }
        Err(e) => {
            warn!(%kind, "Pass task did not complete: {}", e);
            None
        }
    }
}
