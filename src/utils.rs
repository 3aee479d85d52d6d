use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{PlaylistSummary, PlaylistTableRow, PlaylistTrack, TrackTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Number of page requests needed to read `total` items `page_size` at a time.
/// An empty collection still takes one request to learn that it is empty.
pub fn expected_requests(total: u32, page_size: u32) -> u32 {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Offsets of the pages of a collection of `total` items.
pub fn page_offsets(total: u32, page_size: u32) -> Vec<u32> {
    let page_size = page_size.max(1);
    (0..expected_requests(total, page_size))
        .map(|page| page * page_size)
        .collect()
}

/// Formats a track length as `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_duration(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

pub fn yes_no(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}

/// Resolves a playlist given either by id or by its 1-based position in the
/// playlist table.
pub fn find_playlist<'a>(
    playlists: &'a [PlaylistSummary],
    selector: &str,
) -> Option<&'a PlaylistSummary> {
    let selector = selector.trim();
    if let Some(playlist) = playlists.iter().find(|p| p.id == selector) {
        return Some(playlist);
    }

    selector
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| playlists.get(index))
}

pub fn playlist_rows(playlists: &[PlaylistSummary]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: p.name.clone(),
            owner: p.owner_name().to_string(),
            tracks: p.tracks.total,
            public: yes_no(p.is_public()),
        })
        .collect()
}

/// Builds one row per playlist entry, keeping the playlist order. Entries
/// whose track is gone are shown as unavailable rather than skipped so the
/// positions match the playlist.
pub fn track_rows(items: &[PlaylistTrack]) -> Vec<TrackTableRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match &item.track {
            Some(track) => TrackTableRow {
                position: i + 1,
                name: track.name.clone(),
                artists: track
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                album: track
                    .album
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                duration: format_duration(track.duration_ms),
            },
            None => TrackTableRow {
                position: i + 1,
                name: "(unavailable)".to_string(),
                artists: String::new(),
                album: String::new(),
                duration: String::new(),
            },
        })
        .collect()
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
