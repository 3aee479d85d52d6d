//! # CLI Module
//!
//! User facing commands of plsort. Each command opens a session (stored token,
//! current user), drives one or two paginated traversals and renders the
//! collected collections as tables.
//!
//! - [`auth`] - OAuth 2.0 PKCE login, stores the token locally
//! - [`list_playlists`] - every playlist of the logged in user
//! - [`show_playlist`] - header and tracks of one selected playlist
//!
//! ```text
//! CLI Layer (tables, spinners)
//!     ↓
//! Paging Layer (Aggregator, Selection)
//!     ↓
//! Spotify Layer (page sources)
//! ```
//!
//! Failing pages are reported as warnings and whatever was fetched before is
//! still shown. Missing or expired credentials end the program with a hint to
//! run `plsort auth`.
//!
//! ```bash
//! plsort auth            # Authenticate with Spotify
//! plsort playlists       # List your playlists
//! plsort tracks 3        # Tracks of the third playlist in that list
//! plsort tracks 37i9dQZF1DXcBWIGoYBM5M
//! ```

mod auth;
mod playlists;
mod session;
mod tracks;

pub use auth::auth;
pub use playlists::list_playlists;
pub use tracks::show_playlist;
