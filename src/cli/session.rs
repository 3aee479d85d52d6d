use crate::{
    config, error,
    management::TokenManager,
    paging::{AggregateError, AuthContext, DriftPolicy, FetchError},
    spotify, types::UserProfile, warning,
};

/// Everything a command needs before it can start a traversal.
pub struct Session {
    pub auth: AuthContext,
    pub user: UserProfile,
    pub drift_policy: DriftPolicy,
}

/// Loads the stored token, refreshes it if needed and fetches the current
/// user. Terminates the program with a hint when the user has to log in.
pub async fn open() -> Session {
    let drift_policy = match config::drift_policy() {
        Ok(policy) => policy,
        Err(e) => error!("Invalid PLSORT_DRIFT_POLICY: {}", e),
    };

    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run plsort auth\n Error: {}",
                e
            );
        }
    };

    if let Err(e) = token_mgr.refresh_if_expired().await {
        warning!("Failed to refresh token: {}", e);
    }

    let auth = token_mgr.auth_context();
    let token = match auth.bearer() {
        Ok(token) => token.to_string(),
        Err(e) => report_start_error(&e),
    };

    let user = match spotify::user::current_user(&token).await {
        Ok(user) => user,
        Err(FetchError::Unauthorized) => {
            error!("Spotify rejected the stored token. Please run plsort auth")
        }
        Err(e) => error!("Failed to fetch user profile: {}", e),
    };

    Session {
        auth,
        user,
        drift_policy,
    }
}

/// Explains why a traversal could not be started and exits.
pub fn report_start_error(err: &AggregateError) -> ! {
    let message = match err {
        AggregateError::AuthMissing => {
            "Not logged in to Spotify. Please run plsort auth".to_string()
        }
        AggregateError::AuthExpired { .. } => {
            "The stored token has expired; these tokens last for an hour. Please run plsort auth"
                .to_string()
        }
        other => other.to_string(),
    };
    error!("{}", message);
}
