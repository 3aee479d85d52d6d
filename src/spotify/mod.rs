//! # Spotify Integration Module
//!
//! HTTP layer between plsort and the Spotify Web API.
//!
//! ```text
//! CLI Layer
//!     ↓
//! Paging (Aggregator, Selection)
//!     ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE, token refresh)
//!     ├── User profile
//!     ├── User playlists  (page source)
//!     └── Playlist tracks (page source)
//!     ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `GET /me` - profile of the authenticated user
//! - `GET /users/{user_id}/playlists` - playlists of a user, offset paginated
//! - `GET /playlists/{playlist_id}/tracks` - tracks of a playlist, offset paginated
//! - `POST /api/token` - token exchange and refresh
//!
//! ## Error Handling
//!
//! Requests are not retried here. A 401 becomes [`FetchError::Unauthorized`],
//! a 429 becomes [`FetchError::RateLimited`] carrying the `Retry-After` value
//! and every other non-success status is reported as reqwest's status error.
//! Retrying is left to whoever restarts the traversal.

pub mod auth;
pub mod playlists;
pub mod tracks;
pub mod user;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::paging::FetchError;

pub use playlists::UserPlaylists;
pub use tracks::PlaylistTracks;

/// Sends an authenticated GET request and decodes the JSON body.
pub async fn get_json<R>(client: &Client, url: &str, token: &str) -> Result<R, FetchError>
where
    R: DeserializeOwned,
{
    let response = client.get(url).bearer_auth(token).send().await?;

    let response = match response.status() {
        StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok());
            return Err(FetchError::RateLimited { retry_after });
        }
        _ => response.error_for_status()?,
    };

    Ok(response.json::<R>().await?)
}
