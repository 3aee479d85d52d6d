//! # API Module
//!
//! Routes of the short-lived local HTTP server that exists only while
//! `plsort auth` is waiting for Spotify to redirect the browser back.
//!
//! - [`callback`] - receives the authorization code (or the denial) and
//!   exchanges it for a token using the PKCE verifier held in shared state
//! - [`health`] - reports name and version, handy to check that the port is
//!   reachable before registering the redirect URI
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use plsort::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
