use tabled::Table;

use crate::{
    cli::{playlists::fetch_playlists, session},
    config, error, info,
    paging::{Aggregator, Notice, Selection},
    spotify::PlaylistTracks,
    success,
    types::PlaylistSummary,
    utils, warning,
};

/// Shows the tracks of one playlist, selected by id or by its position in the
/// `plsort playlists` table.
pub async fn show_playlist(selector: String) {
    let session = session::open().await;
    let playlists = fetch_playlists(&session).await;

    let Some(playlist) = utils::find_playlist(&playlists, &selector) else {
        error!(
            "No playlist '{}' among your {} playlists. Run plsort playlists to list them.",
            selector,
            playlists.len()
        );
    };

    print_header(playlist);

    let aggregator = Aggregator::new("tracks", config::track_page_size())
        .with_drift_policy(session.drift_policy);
    let mut selection = Selection::new(aggregator, |id: &str| PlaylistTracks::new(id));

    if let Err(e) = selection.select(playlist.id.clone(), &session.auth) {
        session::report_start_error(&e);
    }

    let pb = utils::spinner(format!("Fetching tracks of {}...", playlist.name));
    while selection.is_busy() {
        let Some(notice) = selection.aggregator_mut().next_notice().await else {
            break;
        };
        match notice {
            Notice::Progress { fetched, total, .. } => {
                pb.set_message(format!("Fetched {}/{} tracks...", fetched, total));
            }
            Notice::Completed { .. } => {
                pb.finish_and_clear();
                success!("Fetched {} tracks!", selection.selected_items().len());
            }
            Notice::Failed { .. } => {
                pb.finish_and_clear();
                warning!(
                    "Showing {} tracks fetched before the failure.",
                    selection.selected_items().len()
                );
            }
        }
    }
    pb.finish_and_clear();

    let rows = utils::track_rows(selection.selected_items());
    if rows.is_empty() {
        info!("This playlist has no tracks.");
        return;
    }

    println!("{}", Table::new(rows));
}

fn print_header(playlist: &PlaylistSummary) {
    info!("{}", playlist.name);
    println!(
        "    {} | Tracks: {} | {} | {}",
        playlist.owner_name(),
        playlist.tracks.total,
        playlist
            .external_urls
            .spotify
            .as_deref()
            .unwrap_or("no Spotify link"),
        if playlist.is_public() {
            "Public"
        } else {
            "Private"
        }
    );
    if let Some(url) = playlist.artwork_url() {
        println!("    Artwork: {}", url);
    }
}
