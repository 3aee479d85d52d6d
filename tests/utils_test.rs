use plsort::types::{
    AlbumRef, ArtistRef, ExternalUrls, PlaylistOwner, PlaylistSummary, PlaylistTrack,
    PlaylistTracksRef, Track,
};
use plsort::utils::*;

// Helper function to create a test playlist
fn create_test_playlist(id: &str, name: &str, owner: Option<&str>, total: u32) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        owner: PlaylistOwner {
            id: format!("{}_owner", id),
            display_name: owner.map(str::to_string),
            uri: format!("spotify:user:{}_owner", id),
            href: format!("https://api.spotify.com/v1/users/{}_owner", id),
        },
        tracks: PlaylistTracksRef { total },
        public: Some(true),
        collaborative: false,
        images: None,
        external_urls: ExternalUrls::default(),
    }
}

// Helper function to create a test playlist entry
fn create_test_track(name: &str, artists: &[&str], duration_ms: u64) -> PlaylistTrack {
    PlaylistTrack {
        added_at: Some("2023-10-17T12:00:00Z".to_string()),
        track: Some(Track {
            id: Some(format!("{}_id", name)),
            name: name.to_string(),
            uri: format!("spotify:track:{}_id", name),
            duration_ms,
            artists: artists
                .iter()
                .map(|a| ArtistRef {
                    id: None,
                    name: a.to_string(),
                })
                .collect(),
            album: Some(AlbumRef {
                id: None,
                name: format!("{} album", name),
            }),
        }),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // SHA256 digest is 32 bytes, 43 characters in unpadded base64
    assert_eq!(challenge.len(), 43);
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_expected_requests() {
    assert_eq!(expected_requests(45, 20), 3);
    assert_eq!(expected_requests(40, 20), 2);
    assert_eq!(expected_requests(1, 100), 1);
    // an empty collection still needs the first request
    assert_eq!(expected_requests(0, 20), 1);
    assert_eq!(expected_requests(5, 0), 5);
}

#[test]
fn test_page_offsets() {
    assert_eq!(page_offsets(45, 20), vec![0, 20, 40]);
    assert_eq!(page_offsets(0, 20), vec![0]);
    assert_eq!(page_offsets(250, 100), vec![0, 100, 200]);
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(61_000), "1:01");
    assert_eq!(format_duration(215_999), "3:35");
    assert_eq!(format_duration(3_723_000), "1:02:03");
}

#[test]
fn test_find_playlist_by_id_or_position() {
    let playlists = vec![
        create_test_playlist("abc", "Morning", Some("Alice"), 12),
        create_test_playlist("def", "Evening", Some("Bob"), 3),
    ];

    assert_eq!(find_playlist(&playlists, "def").map(|p| p.name.as_str()), Some("Evening"));
    assert_eq!(find_playlist(&playlists, "1").map(|p| p.name.as_str()), Some("Morning"));
    assert_eq!(find_playlist(&playlists, " 2 ").map(|p| p.name.as_str()), Some("Evening"));
    assert!(find_playlist(&playlists, "0").is_none());
    assert!(find_playlist(&playlists, "3").is_none());
    assert!(find_playlist(&playlists, "xyz").is_none());
}

#[test]
fn test_playlist_rows() {
    let mut private = create_test_playlist("def", "Evening", None, 3);
    private.public = None;
    let playlists = vec![create_test_playlist("abc", "Morning", Some("Alice"), 12), private];

    let rows = playlist_rows(&playlists);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].index, 1);
    assert_eq!(rows[0].owner, "Alice");
    assert_eq!(rows[0].tracks, 12);
    assert_eq!(rows[0].public, "Yes");
    // Falls back to the owner id without a display name
    assert_eq!(rows[1].owner, "def_owner");
    assert_eq!(rows[1].public, "No");
}

#[test]
fn test_track_rows_keep_playlist_order() {
    let items = vec![
        create_test_track("First", &["Artist A", "Artist B"], 185_000),
        PlaylistTrack {
            added_at: None,
            track: None,
        },
        create_test_track("Third", &["Artist C"], 59_000),
    ];

    let rows = track_rows(&items);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].artists, "Artist A, Artist B");
    assert_eq!(rows[0].album, "First album");
    assert_eq!(rows[0].duration, "3:05");
    assert_eq!(rows[1].name, "(unavailable)");
    assert_eq!(rows[2].position, 3);
    assert_eq!(rows[2].name, "Third");
}
