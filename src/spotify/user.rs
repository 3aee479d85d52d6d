use reqwest::Client;

use crate::{config, paging::FetchError, spotify::get_json, types::UserProfile};

/// Fetches the profile of the user the token belongs to.
///
/// The profile's id is needed to address the user's playlists, its display
/// name is shown as "Logged in as ...".
pub async fn current_user(token: &str) -> Result<UserProfile, FetchError> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());
    get_json::<UserProfile>(&Client::new(), &api_url, token).await
}
