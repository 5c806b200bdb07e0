use crate::domain::{DomainError, MediaItem, MediaKind, RawMediaRecord, TimestampUnit};

/// Turns raw index rows into [`MediaItem`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaItemProjector {
    unit: TimestampUnit,
}

impl MediaItemProjector {
    pub fn new(unit: TimestampUnit) -> Self {
        Self { unit }
    }

    /// Only `id`, `path` and `mime_type` are mandatory. Everything else falls
    /// back to a neutral default.
    pub fn project(&self, record: RawMediaRecord, kind: MediaKind) -> Result<MediaItem, DomainError> {
        let id = record
            .id
            .ok_or_else(|| DomainError::MalformedRow(format!("{} row without id", kind)))?;
        let path = record
            .usable_path()
            .map(str::to_string)
            .ok_or_else(|| DomainError::MalformedRow(format!("{} {} has no path", kind, id)))?;
        let mime_type = record
            .mime_type
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DomainError::MalformedRow(format!("{} {} has no mime type", kind, id)))?;

        let name = match record.display_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => file_name(&path).to_string(),
        };

        let duration_ms = match kind {
            MediaKind::Video => record.duration_ms.unwrap_or(0).max(0),
            MediaKind::Image => 0,
        };

        Ok(MediaItem {
            id,
            kind,
            name,
            added_at: record.date_added,
            added_at_utc: self.unit.to_utc(record.date_added),
            size_bytes: record.size_bytes,
            mime_type,
            group_id: record.group_id.unwrap_or_default(),
            group_name: record.group_name.unwrap_or_default(),
            duration_ms,
            width: record.width.unwrap_or(0),
            height: record.height.unwrap_or(0),
            path,
        })
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(&['/', '\\'][..]).next().unwrap_or(path)
}
