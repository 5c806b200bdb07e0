use crate::domain::{DomainError, MediaIndex, MediaKind, RawMediaRecord, ScanStatus};
use std::sync::Arc;
use tracing::{debug, warn};

/// Row counts for one pass over the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub rows: usize,
    pub skipped: usize,
}

/// Wraps the media index with per-row error absorption.
#[derive(Clone)]
pub struct MediaRecordSource {
    index: Arc<dyn MediaIndex>,
}

impl MediaRecordSource {
    pub fn new(index: Arc<dyn MediaIndex>) -> Self {
        Self { index }
    }

    /// Stream records of one kind into `visit`, skipping malformed rows.
    ///
    /// Blocking. A failure of the whole query becomes `SourceUnavailable`.
    pub fn scan<F>(
        &self,
        kind: MediaKind,
        group_id: Option<&str>,
        mut visit: F,
    ) -> Result<PassStats, DomainError>
    where
        F: FnMut(RawMediaRecord),
    {
        let mut stats = PassStats::default();

        self.index
            .query_group(kind, group_id, &mut |row: Result<RawMediaRecord, DomainError>| match row {
                Ok(record) => {
                    stats.rows += 1;
                    visit(record);
                }
                Err(e) => {
                    stats.skipped += 1;
                    warn!(%kind, "Skipping unreadable index row: {}", e);
                }
            })
            .map_err(|e| match e {
                DomainError::SourceUnavailable { .. } => e,
                other => DomainError::SourceUnavailable {
                    kind,
                    reason: other.to_string(),
                },
            })?;

        debug!(%kind, group = group_id, rows = stats.rows, skipped = stats.skipped, "Index pass finished");
        Ok(stats)
    }

    pub fn query_images(&self) -> Result<Vec<RawMediaRecord>, DomainError> {
        self.collect(MediaKind::Image, None)
    }

    pub fn query_videos(&self) -> Result<Vec<RawMediaRecord>, DomainError> {
        self.collect(MediaKind::Video, None)
    }

    /// Images and videos of one bucket, each tagged with its kind, plus the
    /// status of the two passes. Fails only when both passes fail.
    ///
    /// Blocking; the passes run one after the other.
    pub fn query_group(
        &self,
        group_id: &str,
    ) -> Result<(Vec<(MediaKind, RawMediaRecord)>, ScanStatus), DomainError> {
        let mut records = Vec::new();

        let images = self.scan(MediaKind::Image, Some(group_id), |record| {
            records.push((MediaKind::Image, record))
        });
        let videos = self.scan(MediaKind::Video, Some(group_id), |record| {
            records.push((MediaKind::Video, record))
        });

        let status = ScanStatus::from_passes(images.is_ok(), videos.is_ok());
        match (images, videos) {
            (Err(_), Err(e)) => Err(e),
            (images, videos) => {
                for e in [images.err(), videos.err()].into_iter().flatten() {
                    warn!(group = group_id, "Bucket pass degraded to empty: {}", e);
                }
                Ok((records, status))
            }
        }
    }

    fn collect(
        &self,
        kind: MediaKind,
        group_id: Option<&str>,
    ) -> Result<Vec<RawMediaRecord>, DomainError> {
        let mut records = Vec::new();
        self.scan(kind, group_id, |record| records.push(record))?;
        Ok(records)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{record, video, FakeIndex};
    use super::*;

    #[test]
    fn queries_each_kind_separately() {
        let index = FakeIndex::new(
            vec![record(1, "A", "Camera", "/dcim/a.jpg", 10)],
            vec![video(1, "A", "Camera", "/dcim/a.mp4", 20)],
        );
        let source = MediaRecordSource::new(Arc::new(index));

        let images = source.query_images().unwrap();
        let videos = source.query_videos().unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].path.as_deref(), Some("/dcim/a.jpg"));
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].duration_ms, Some(12_000));
    }

    #[test]
    fn index_failure_is_source_unavailable() {
        let index = FakeIndex::new(vec![], vec![]).failing(MediaKind::Video);
        let source = MediaRecordSource::new(Arc::new(index));

        match source.query_videos() {
            Err(DomainError::SourceUnavailable { kind, .. }) => assert_eq!(kind, MediaKind::Video),
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
        assert!(source.query_images().unwrap().is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let index = FakeIndex::new(vec![record(1, "A", "Camera", "/a.jpg", 1)], vec![])
            .with_malformed_row(MediaKind::Image);
        let source = MediaRecordSource::new(Arc::new(index));

        let mut seen = 0;
        let stats = source.scan(MediaKind::Image, None, |_| seen += 1).unwrap();

        assert_eq!(seen, 1);
        assert_eq!(stats, PassStats { rows: 1, skipped: 1 });
    }

    #[test]
    fn group_query_filters_and_tags_kind() {
        let index = FakeIndex::new(
            vec![
                record(1, "A", "Camera", "/a/1.jpg", 1),
                record(2, "B", "Other", "/b/2.jpg", 2),
            ],
            vec![video(7, "A", "Camera", "/a/7.mp4", 3)],
        );
        let source = MediaRecordSource::new(Arc::new(index));

        let (rows, status) = source.query_group("A").unwrap();

        assert_eq!(status, ScanStatus::Complete);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|(k, r)| *k == MediaKind::Image && r.id == Some(1)));
        assert!(rows.iter().any(|(k, r)| *k == MediaKind::Video && r.id == Some(7)));
    }

    #[test]
    fn group_query_degrades_when_one_kind_fails() {
        let index = FakeIndex::new(vec![record(1, "A", "Camera", "/a/1.jpg", 1)], vec![])
            .failing(MediaKind::Video);
        let source = MediaRecordSource::new(Arc::new(index));

        let (rows, status) = source.query_group("A").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            status,
            ScanStatus::Partial {
                unavailable: MediaKind::Video
            }
        );
    }

    #[test]
    fn group_query_fails_when_both_kinds_fail() {
        let index = FakeIndex::new(vec![], vec![])
            .failing(MediaKind::Image)
            .failing(MediaKind::Video);
        let source = MediaRecordSource::new(Arc::new(index));

        assert!(matches!(
            source.query_group("A"),
            Err(DomainError::SourceUnavailable { .. })
        ));
    }
}
