use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which index table a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "images" => Ok(MediaKind::Image),
            "video" | "videos" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

/// Unit of the index's `date_added` column. Fixed for the lifetime of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Millis,
}

impl TimestampUnit {
    pub fn to_utc(&self, raw: i64) -> Option<DateTime<Utc>> {
        match self {
            TimestampUnit::Seconds => DateTime::from_timestamp(raw, 0),
            TimestampUnit::Millis => DateTime::from_timestamp_millis(raw),
        }
    }
}

impl FromStr for TimestampUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(TimestampUnit::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(TimestampUnit::Millis),
            other => Err(format!("unknown timestamp unit '{}'", other)),
        }
    }
}

/// One row as reported by the media index, before projection.
///
/// Columns the index may leave NULL are kept optional here; the projector
/// decides which of them are mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMediaRecord {
    pub id: Option<i64>,
    pub path: Option<String>,
    pub display_name: Option<String>,
    pub date_added: i64,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    /// Video rows only, milliseconds.
    pub duration_ms: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl RawMediaRecord {
    /// Grouping key and display name, or `None` if either is missing or blank.
    pub fn grouping(&self) -> Option<(&str, &str)> {
        let id = self.group_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let name = self.group_name.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((id, name))
    }

    /// The file path, unless it is missing or blank.
    pub fn usable_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub kind: MediaKind,
    pub path: String,
    pub name: String,
    pub added_at: i64,
    pub added_at_utc: Option<DateTime<Utc>>,
    pub size_bytes: i64,
    pub mime_type: String,
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.indicator() == Some(MediaKind::Video)
    }

    pub fn is_image(&self) -> bool {
        self.indicator() == Some(MediaKind::Image)
    }

    /// Kind implied by the MIME type. `None` for anything that is neither
    /// `image/*` nor `video/*`.
    pub fn indicator(&self) -> Option<MediaKind> {
        let (top, _) = self.mime_type.split_once('/')?;
        if mime::IMAGE == top {
            Some(MediaKind::Image)
        } else if mime::VIDEO == top {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Ids are only unique per index table.
    pub fn key(&self) -> (MediaKind, i64) {
        (self.kind, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumKind {
    Camera,
    Screenshots,
    #[serde(rename = "whatsapp_images")]
    WhatsAppImages,
    #[serde(rename = "whatsapp_video")]
    WhatsAppVideo,
    Downloads,
    Videos,
    Regular,
}

impl AlbumKind {
    pub fn is_special(&self) -> bool {
        !matches!(self, AlbumKind::Regular)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlbumKind::Camera => "camera",
            AlbumKind::Screenshots => "screenshots",
            AlbumKind::WhatsAppImages => "whatsapp_images",
            AlbumKind::WhatsAppVideo => "whatsapp_video",
            AlbumKind::Downloads => "downloads",
            AlbumKind::Videos => "videos",
            AlbumKind::Regular => "regular",
        }
    }
}

/// Representative image of an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "path", rename_all = "snake_case")]
pub enum Cover {
    Path(String),
    /// No record in the group had a usable path.
    Missing,
}

impl Cover {
    pub fn path(&self) -> Option<&str> {
        match self {
            Cover::Path(p) => Some(p),
            Cover::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub group_id: String,
    pub cover: Cover,
    pub media_count: u64,
    pub image_count: u64,
    pub video_count: u64,
    pub kind: AlbumKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanStatus {
    Complete,
    /// One pass failed; items were built from the other one only.
    Partial { unavailable: MediaKind },
    /// Both passes failed. Items are empty and the request should be retried.
    Unavailable,
}

impl ScanStatus {
    /// Status of a scan given which of the image and video passes succeeded.
    pub fn from_passes(images_ok: bool, videos_ok: bool) -> Self {
        match (images_ok, videos_ok) {
            (true, true) => ScanStatus::Complete,
            (true, false) => ScanStatus::Partial {
                unavailable: MediaKind::Video,
            },
            (false, true) => ScanStatus::Partial {
                unavailable: MediaKind::Image,
            },
            (false, false) => ScanStatus::Unavailable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, ScanStatus::Complete)
    }
}

/// Result of one scan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub status: ScanStatus,
    pub retryable: bool,
    pub scanned_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn new(items: Vec<T>, status: ScanStatus) -> Self {
        Self {
            items,
            status,
            retryable: status.is_retryable(),
            scanned_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub status: ScanStatus,
    pub retryable: bool,
}
