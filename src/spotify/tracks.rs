use reqwest::Client;

use crate::{
    config,
    paging::{FetchError, Page, PageSource},
    spotify::get_json,
    types::{Paging, PlaylistTrack},
};

/// Page source over the tracks of one playlist.
///
/// Requests `GET /playlists/{playlist_id}/tracks?offset={offset}&limit={limit}`,
/// at most 100 items per page.
#[derive(Debug, Clone)]
pub struct PlaylistTracks {
    client: Client,
    api_url: String,
    playlist_id: String,
}

impl PlaylistTracks {
    pub fn new(playlist_id: impl Into<String>) -> Self {
        Self::with_api_url(config::spotify_apiurl(), playlist_id)
    }

    pub fn with_api_url(api_url: impl Into<String>, playlist_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            playlist_id: playlist_id.into(),
        }
    }

    pub fn page_url(&self, offset: u32, limit: u32) -> String {
        format!(
            "{uri}/playlists/{id}/tracks?offset={offset}&limit={limit}",
            uri = self.api_url,
            id = self.playlist_id,
            offset = offset,
            limit = limit
        )
    }
}

impl PageSource<PlaylistTrack> for PlaylistTracks {
    async fn fetch_page(
        &self,
        token: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistTrack>, FetchError> {
        let api_url = self.page_url(offset, limit);
        let res = get_json::<Paging<PlaylistTrack>>(&self.client, &api_url, token).await?;

        Ok(Page::new(res.items, res.total))
    }
}
