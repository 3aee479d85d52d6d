use chrono::{Duration, Utc};
use plsort::{
    config::parse_page_size,
    management::TokenManager,
    paging::{AggregateError, AuthContext, DriftPolicy, FetchCursor},
    spotify::{PlaylistTracks, UserPlaylists, auth::token_from_json},
    types::{Paging, PlaylistSummary, PlaylistTrack, Token},
};
use serde_json::json;

fn token_obtained_secs_ago(secs: i64, access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-read-private".to_string(),
        expires_in: 3600,
        obtained_at: (Utc::now().timestamp() - secs) as u64,
    }
}

#[test]
fn test_decode_playlists_page() {
    let body = json!({
        "href": "https://api.spotify.com/v1/users/alice/playlists?offset=0&limit=20",
        "items": [{
            "id": "37i9dQZF1DXcBWIGoYBM5M",
            "name": "Today's Top Hits",
            "collaborative": false,
            "public": true,
            "owner": {
                "id": "spotify",
                "display_name": "Spotify",
                "uri": "spotify:user:spotify",
                "href": "https://api.spotify.com/v1/users/spotify"
            },
            "tracks": { "href": "https://api.spotify.com/v1/playlists/x/tracks", "total": 50 },
            "images": [{ "url": "https://i.scdn.co/image/ab67", "height": 640, "width": 640 }],
            "external_urls": { "spotify": "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M" }
        }],
        "limit": 20,
        "next": null,
        "offset": 0,
        "previous": null,
        "total": 1
    });

    let page: Paging<PlaylistSummary> = serde_json::from_value(body).unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.limit, 20);
    assert!(page.next.is_none());
    let playlist = &page.items[0];
    assert_eq!(playlist.owner_name(), "Spotify");
    assert_eq!(playlist.tracks.total, 50);
    assert!(playlist.is_public());
    assert_eq!(playlist.artwork_url(), Some("https://i.scdn.co/image/ab67"));
}

#[test]
fn test_decode_playlist_without_images_or_visibility() {
    let body = json!({
        "id": "p1",
        "name": "Drafts",
        "public": null,
        "images": null,
        "owner": { "id": "alice", "display_name": null, "uri": "spotify:user:alice", "href": "h" },
        "tracks": { "total": 0 }
    });

    let playlist: PlaylistSummary = serde_json::from_value(body).unwrap();

    assert!(!playlist.is_public());
    assert!(playlist.artwork_url().is_none());
    assert_eq!(playlist.owner_name(), "alice");
    assert!(playlist.external_urls.spotify.is_none());
}

#[test]
fn test_decode_tracks_page_with_unavailable_entry() {
    let body = json!({
        "items": [
            {
                "added_at": "2023-10-17T12:00:00Z",
                "track": {
                    "id": "t1",
                    "name": "Song",
                    "uri": "spotify:track:t1",
                    "duration_ms": 201000,
                    "artists": [{ "id": "a1", "name": "Band" }],
                    "album": { "id": "al1", "name": "Record" }
                }
            },
            { "added_at": null, "track": null }
        ],
        "limit": 100,
        "offset": 0,
        "next": null,
        "total": 2
    });

    let page: Paging<PlaylistTrack> = serde_json::from_value(body).unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].track.as_ref().map(|t| t.duration_ms), Some(201000));
    assert!(page.items[1].track.is_none());
}

#[test]
fn test_page_urls() {
    let playlists = UserPlaylists::with_api_url("https://api.example.com/v1", "alice");
    assert_eq!(
        playlists.page_url(40, 20),
        "https://api.example.com/v1/users/alice/playlists?offset=40&limit=20"
    );

    let tracks = PlaylistTracks::with_api_url("https://api.example.com/v1", "p1");
    assert_eq!(
        tracks.page_url(100, 100),
        "https://api.example.com/v1/playlists/p1/tracks?offset=100&limit=100"
    );
}

#[test]
fn test_auth_context_checks() {
    let now = Utc::now();

    let valid = AuthContext::new(Some("abc".to_string()), now + Duration::minutes(5));
    assert!(valid.token_exists());
    assert_eq!(valid.bearer_at(now).unwrap(), "abc");

    let expired = AuthContext::new(Some("abc".to_string()), now - Duration::seconds(1));
    assert!(matches!(
        expired.bearer_at(now),
        Err(AggregateError::AuthExpired { .. })
    ));

    let missing = AuthContext::anonymous();
    assert!(!missing.token_exists());
    assert!(matches!(missing.bearer_at(now), Err(AggregateError::AuthMissing)));
}

#[test]
fn test_token_manager_auth_context() {
    let fresh = TokenManager::new(token_obtained_secs_ago(10, "access"));
    assert!(!fresh.is_expired());
    assert_eq!(fresh.auth_context().bearer().unwrap(), "access");

    // inside the refresh margin counts as expired
    let stale = TokenManager::new(token_obtained_secs_ago(3500, "access"));
    assert!(stale.is_expired());
    assert!(matches!(
        stale.auth_context().bearer(),
        Err(AggregateError::AuthExpired { .. })
    ));

    let empty = TokenManager::new(token_obtained_secs_ago(10, ""));
    assert!(matches!(
        empty.auth_context().bearer(),
        Err(AggregateError::AuthMissing)
    ));
}

#[test]
fn test_token_from_json() {
    let token = token_from_json(
        &json!({ "access_token": "new", "scope": "s", "expires_in": 1800 }),
        Some("old-refresh"),
    )
    .unwrap();
    assert_eq!(token.access_token, "new");
    assert_eq!(token.refresh_token, "old-refresh");
    assert_eq!(token.expires_in, 1800);

    assert!(token_from_json(&json!({ "access_token": "new" }), None).is_err());
    assert!(token_from_json(&json!({ "error": "invalid_grant" }), Some("r")).is_err());
}

#[test]
fn test_fetch_cursor() {
    let mut cursor = FetchCursor::start("p1", 20);
    assert_eq!(cursor.offset, 0);
    assert!(!cursor.exhausted());

    cursor.total = Some(45);
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.offset, 40);
    assert!(!cursor.exhausted());

    cursor.advance();
    assert!(cursor.exhausted());

    cursor.rewind();
    assert_eq!(cursor.offset, 0);
    assert_eq!(FetchCursor::start("p1", 0).limit, 1);
}

#[test]
fn test_parse_page_size() {
    assert_eq!(parse_page_size(None, 20, 50), 20);
    assert_eq!(parse_page_size(Some("35"), 20, 50), 35);
    assert_eq!(parse_page_size(Some("500"), 20, 50), 50);
    assert_eq!(parse_page_size(Some("0"), 20, 50), 1);
    assert_eq!(parse_page_size(Some("many"), 100, 100), 100);
}

#[test]
fn test_parse_drift_policy() {
    assert_eq!("accept".parse::<DriftPolicy>(), Ok(DriftPolicy::AcceptPartial));
    assert_eq!(
        "Restart".parse::<DriftPolicy>(),
        Ok(DriftPolicy::Restart { max_restarts: 1 })
    );
    assert_eq!(
        "restart:3".parse::<DriftPolicy>(),
        Ok(DriftPolicy::Restart { max_restarts: 3 })
    );
    assert!("restart:x".parse::<DriftPolicy>().is_err());
    assert!("sometimes".parse::<DriftPolicy>().is_err());
    assert_eq!(DriftPolicy::default(), DriftPolicy::AcceptPartial);
}
