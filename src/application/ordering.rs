use crate::domain::{Album, MediaItem};
use std::cmp::{Ordering, Reverse};

/// Special albums first, then by name.
pub fn compare_albums(a: &Album, b: &Album) -> Ordering {
    a.kind
        .is_special()
        .cmp(&b.kind.is_special())
        .reverse()
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.group_id.cmp(&b.group_id))
}

/// Newest first; equal timestamps fall back to the higher id.
pub fn compare_media(a: &MediaItem, b: &MediaItem) -> Ordering {
    b.added_at
        .cmp(&a.added_at)
        .then_with(|| b.id.cmp(&a.id))
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.path.cmp(&b.path))
}

/// Same order as [`compare_albums`], lowercasing each name once.
pub fn sort_albums(albums: &mut [Album]) {
    albums.sort_by_cached_key(|a| {
        (
            Reverse(a.kind.is_special()),
            a.name.to_lowercase(),
            a.name.clone(),
            a.group_id.clone(),
        )
    });
}

pub fn sort_media(items: &mut [MediaItem]) {
    items.sort_by(compare_media);
}

// Case-insensitive first so "camera" and "Camera" sit together, raw bytes to
// keep the order total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
