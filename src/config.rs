//! Configuration management for plsort.
//!
//! Values are read from environment variables, which may be populated from a
//! `.env` file in the local data directory. The configuration system follows a
//! hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

use crate::paging::DriftPolicy;

/// Page size used when fetching the user's playlists.
pub const PLAYLIST_PAGE_SIZE: u32 = 20;
/// Largest page the playlists endpoint accepts.
pub const PLAYLIST_PAGE_SIZE_MAX: u32 = 50;
/// Page size used when fetching the tracks of a playlist.
pub const TRACK_PAGE_SIZE: u32 = 100;
pub const TRACK_PAGE_SIZE_MAX: u32 = 100;

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Returns the directory holding the `.env` file and all caches.
///
/// - Linux: `~/.local/share/plsort`
/// - macOS: `~/Library/Application Support/plsort`
/// - Windows: `%LOCALAPPDATA%/plsort`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plsort");
    path
}

/// Loads environment variables from `.env` in the local data directory.
///
/// A missing `.env` file is not an error, every setting can also come from the
/// process environment.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses a page size and clamps it to `1..=max`. Unparsable values fall back
/// to `default`.
pub fn parse_page_size(value: Option<&str>, default: u32, max: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
        .clamp(1, max)
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID (`SPOTIFY_API_AUTH_CLIENT_ID`).
///
/// # Errors
///
/// The client ID has no default; an error is returned when it is not set.
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .map_err(|_| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
}

/// Returns the OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`). Defaults to the
/// callback route of the local server.
pub fn spotify_redirect_uri() -> String {
    var_or(
        "SPOTIFY_API_REDIRECT_URI",
        &format!("http://{}/callback", server_addr()),
    )
}

pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`), without a
/// trailing slash.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Page size for playlist traversals (`PLSORT_PLAYLIST_PAGE_SIZE`).
pub fn playlist_page_size() -> u32 {
    parse_page_size(
        env::var("PLSORT_PLAYLIST_PAGE_SIZE").ok().as_deref(),
        PLAYLIST_PAGE_SIZE,
        PLAYLIST_PAGE_SIZE_MAX,
    )
}

/// Page size for track traversals (`PLSORT_TRACK_PAGE_SIZE`).
pub fn track_page_size() -> u32 {
    parse_page_size(
        env::var("PLSORT_TRACK_PAGE_SIZE").ok().as_deref(),
        TRACK_PAGE_SIZE,
        TRACK_PAGE_SIZE_MAX,
    )
}

/// Behaviour when a collection changes size while it is being fetched
/// (`PLSORT_DRIFT_POLICY`: `accept`, `restart` or `restart:<n>`).
///
/// # Errors
///
/// Returns an error for values that are set but not understood.
pub fn drift_policy() -> Result<DriftPolicy, String> {
    match env::var("PLSORT_DRIFT_POLICY") {
        Ok(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(DriftPolicy::default()),
    }
}
