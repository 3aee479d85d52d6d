use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    management::{TokenError, TokenManager},
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// How long to wait for the browser to hit the callback route.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the OAuth 2.0 PKCE flow and persists the obtained token.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to exchange the code for a token
/// 5. Stores the token in the local data directory
///
/// If the browser cannot be opened the URL is printed so the user can open it
/// manually.
///
/// # Errors
///
/// Fails when the client id is not configured, when no token arrives within
/// the login timeout or when the token cannot be written to disk.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, TokenError> {
    let client_id = config::spotify_client_id().map_err(TokenError::Config)?;
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(&client_id, &code_challenge);

    // the callback handler needs the verifier before the browser comes back
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, LOGIN_TIMEOUT).await;
    server.abort();

    let token = token.ok_or(TokenError::Timeout)?;
    TokenManager::new(token.clone()).persist().await?;

    Ok(token)
}

/// Builds the URL of Spotify's authorization page for a PKCE login.
pub fn authorize_url(client_id: &str, code_challenge: &str) -> String {
    format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = client_id,
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope().replace(' ', "%20")
    )
}

/// Polls the shared state once per second until the callback handler stored
/// a token, or `max_wait` has passed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token. When the response carries
/// none, the old one is kept.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, TokenError> {
    let client_id = config::spotify_client_id().map_err(TokenError::Config)?;

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_json(&json, Some(refresh_token))
}

/// Exchanges the authorization code from the callback for a token, proving
/// possession of the PKCE verifier.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, TokenError> {
    let client_id = config::spotify_client_id().map_err(TokenError::Config)?;
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_json(&json, None)
}

/// Reads a token endpoint response. `fallback_refresh` is used when the
/// response does not contain a refresh token.
pub fn token_from_json(json: &Value, fallback_refresh: Option<&str>) -> Result<Token, TokenError> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or(TokenError::MissingField("access_token"))?;

    let refresh_token = match (json["refresh_token"].as_str(), fallback_refresh) {
        (Some(token), _) => token,
        (None, Some(fallback)) => fallback,
        (None, None) => return Err(TokenError::MissingField("refresh_token")),
    };

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
