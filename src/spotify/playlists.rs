use reqwest::Client;

use crate::{
    config,
    paging::{FetchError, Page, PageSource},
    spotify::get_json,
    types::{Paging, PlaylistSummary},
};

/// Page source over the playlists of one user.
///
/// Requests `GET /users/{user_id}/playlists?offset={offset}&limit={limit}`.
/// The endpoint accepts at most 50 items per page.
#[derive(Debug, Clone)]
pub struct UserPlaylists {
    client: Client,
    api_url: String,
    user_id: String,
}

impl UserPlaylists {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_api_url(config::spotify_apiurl(), user_id)
    }

    pub fn with_api_url(api_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            user_id: user_id.into(),
        }
    }

    pub fn page_url(&self, offset: u32, limit: u32) -> String {
        format!(
            "{uri}/users/{user_id}/playlists?offset={offset}&limit={limit}",
            uri = self.api_url,
            user_id = self.user_id,
            offset = offset,
            limit = limit
        )
    }
}

impl PageSource<PlaylistSummary> for UserPlaylists {
    async fn fetch_page(
        &self,
        token: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistSummary>, FetchError> {
        let api_url = self.page_url(offset, limit);
        let res = get_json::<Paging<PlaylistSummary>>(&self.client, &api_url, token).await?;

        Ok(Page::new(res.items, res.total))
    }
}
