use crate::domain::AlbumKind;

/// Map a bucket display name to the kind of album it represents.
///
/// Rules are checked in order and the first match wins. All comparisons
/// ignore case.
pub fn classify(group_name: &str) -> AlbumKind {
    let name = group_name.trim().to_lowercase();
    let is = |candidates: &[&str]| candidates.iter().any(|c| name == *c);
    let has = |needle: &str| name.contains(needle);

    if is(&["camera", "dcim"]) {
        AlbumKind::Camera
    } else if has("screenshot") {
        AlbumKind::Screenshots
    } else if has("whatsapp") && has("images") {
        AlbumKind::WhatsAppImages
    } else if has("whatsapp") && has("video") {
        AlbumKind::WhatsAppVideo
    } else if is(&["download", "downloads"]) {
        AlbumKind::Downloads
    } else if is(&["movies", "videos"]) {
        AlbumKind::Videos
    } else {
        AlbumKind::Regular
    }
}
