use tabled::Table;

use crate::{
    cli::session::{self, Session},
    config, info,
    paging::{Aggregator, Notice},
    spotify::UserPlaylists,
    success,
    types::PlaylistSummary,
    utils, warning,
};

/// Lists every playlist of the logged in user.
pub async fn list_playlists() {
    let session = session::open().await;

    info!(
        "Logged in as: {}",
        session
            .user
            .display_name
            .as_deref()
            .unwrap_or(&session.user.id)
    );

    let playlists = fetch_playlists(&session).await;
    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    println!("{}", Table::new(utils::playlist_rows(&playlists)));
}

/// Collects all playlists of the session's user, page by page.
///
/// A failing page stops the traversal; the playlists fetched up to that point
/// are returned after a warning.
pub(crate) async fn fetch_playlists(session: &Session) -> Vec<PlaylistSummary> {
    let key = session.user.id.clone();
    let mut aggregator = Aggregator::new("playlists", config::playlist_page_size())
        .with_drift_policy(session.drift_policy);

    if let Err(e) = aggregator.begin(key.clone(), UserPlaylists::new(&key), &session.auth) {
        session::report_start_error(&e);
    }

    let pb = utils::spinner("Fetching playlists...");
    while let Some(notice) = aggregator.next_notice().await {
        match notice {
            Notice::Progress { fetched, total, .. } => {
                pb.set_message(format!("Fetched {}/{} playlists...", fetched, total));
            }
            Notice::Completed { .. } => {
                pb.finish_and_clear();
                success!("Fetched {} playlists!", aggregator.items(&key).len());
            }
            Notice::Failed { .. } => {
                pb.finish_and_clear();
                warning!(
                    "Showing {} playlists fetched before the failure.",
                    aggregator.items(&key).len()
                );
            }
        }
    }
    pb.finish_and_clear();

    aggregator.take(&key).unwrap_or_default()
}
