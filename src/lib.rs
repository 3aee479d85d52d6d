//! plsort library
//!
//! Browses the playlists of a Spotify account. Every paginated collection
//! (the user's playlists, the tracks of a playlist) is fetched page by page by
//! the [`paging`] engine and assembled into one ordered collection before it
//! is shown.
//!
//! # Modules
//!
//! - `api` - HTTP routes of the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `management` - Token storage and refresh
//! - `paging` - Paginated collection aggregation
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and page sources
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use plsort::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> plsort::Res<()> {
//!     config::load_env().await?;
//!     cli::list_playlists().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod paging;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for top-level plumbing where any error may bubble up.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message prefixed with a blue `o`.
///
/// ```
/// info!("Logged in as: {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message prefixed with a red `!` and exits with status 1.
///
/// Only meant for the CLI layer. Library code reports failures through its
/// return values or with [`warning!`].
///
/// ```
/// error!("Not logged in to Spotify. Please run plsort auth");
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning prefixed with a yellow `!`. Execution continues.
///
/// ```
/// warning!("Failed to fetch {}: {}", kind, error);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
