//! Access-token lifecycle for the remote API.
//!
//! [`TokenManager`] owns the only copy of the current token pair. Callers ask
//! for a bearer string per request via [`TokenManager::valid_token`]; when the
//! pair has expired the manager refreshes it, falling back to a fresh login
//! with the configured credentials.
//!
//! All renewals happen while holding the state lock, so concurrent callers
//! that find the token expired queue behind a single attempt. A counter of
//! completed attempts lets the queued callers tell that an attempt finished
//! while they were waiting, and reuse its outcome instead of starting their own.
//!
//! The stored pair is only replaced after the remote confirms a new one. A
//! renewal future dropped half way leaves the previous pair and the attempt
//! counter untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    config::ApiConfig,
    credentials::{AccessRequest, Credentials},
    error::{ApiError, Result},
};

/// Access/refresh tokens plus the moment they were issued
#[derive(Clone)]
pub(crate) struct TokenPair {
    access_token: String,
    refresh_token: String,
    issued_at: Instant,
    expires_in: Option<Duration>,
}

impl TokenPair {
    /// A pair without a known lifetime counts as expired
    fn is_expired(&self, now: Instant) -> bool {
        match self.expires_in {
            Some(ttl) => now >= self.issued_at + ttl,
            None => true,
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Default)]
struct TokenState {
    pair: Option<TokenPair>,
    last_failure: Option<String>,
}

pub struct TokenManager {
    http: reqwest::Client,
    config: ApiConfig,
    credentials: Credentials,
    state: Mutex<TokenState>,
    completed_renewals: AtomicU64,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, config: ApiConfig, credentials: Credentials) -> Self {
        Self {
            http,
            config,
            credentials,
            state: Mutex::new(TokenState::default()),
            completed_renewals: AtomicU64::new(0),
        }
    }

    /// Log in with the given credentials and, on success, make the new pair current.
    ///
    /// On failure the previous pair stays in place.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let mut state = self.state.lock().await;
        let pair = self.request_login(credentials).await?;
        state.pair = Some(pair);
        state.last_failure = None;
        Ok(())
    }

    /// Exchange the current refresh token for a new pair.
    ///
    /// Calling this while another renewal is in flight waits for that renewal
    /// and returns its outcome.
    pub async fn refresh(&self) -> Result<()> {
        let observed = self.completed_renewals.load(Ordering::Acquire);
        let mut state = self.state.lock().await;
        if self.completed_renewals.load(Ordering::Acquire) != observed {
            return match &state.last_failure {
                Some(reason) => Err(ApiError::Auth(reason.clone())),
                None => Ok(()),
            };
        }

        let refresh_token = state
            .pair
            .as_ref()
            .map(|pair| pair.refresh_token.clone())
            .ok_or_else(|| ApiError::Auth("no refresh token, login required".to_string()))?;

        let outcome = self.request_refresh(&refresh_token).await;
        self.record(&mut state, outcome).map(|_| ())
    }

    /// The current access token, renewed first if it has expired
    pub async fn valid_token(&self) -> Result<String> {
        let observed = self.completed_renewals.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(pair) = &state.pair {
            if !pair.is_expired(Instant::now()) {
                return Ok(pair.access_token.clone());
            }
        }

        if self.completed_renewals.load(Ordering::Acquire) != observed {
            debug!("reusing the outcome of a renewal that finished while waiting");
            return match (&state.last_failure, &state.pair) {
                (Some(reason), _) => Err(ApiError::Auth(reason.clone())),
                (None, Some(pair)) => Ok(pair.access_token.clone()),
                (None, None) => Err(ApiError::Auth("no token available".to_string())),
            };
        }

        let outcome = self.renew(&state).await;
        self.record(&mut state, outcome)
    }

    /// Refresh when a pair exists, otherwise (or if that fails) log in again
    async fn renew(&self, state: &TokenState) -> Result<TokenPair> {
        if let Some(pair) = &state.pair {
            match self.request_refresh(&pair.refresh_token).await {
                Ok(pair) => return Ok(pair),
                Err(e) => warn!("token refresh failed, falling back to login: {}", e),
            }
        }
        self.request_login(&self.credentials).await
    }

    fn record(&self, state: &mut TokenState, outcome: Result<TokenPair>) -> Result<String> {
        let result = match outcome {
            Ok(pair) => {
                let token = pair.access_token.clone();
                state.pair = Some(pair);
                state.last_failure = None;
                Ok(token)
            }
            Err(e) => {
                state.last_failure = Some(e.to_string());
                Err(e)
            }
        };
        self.completed_renewals.fetch_add(1, Ordering::Release);
        result
    }

    async fn request_login(&self, credentials: &Credentials) -> Result<TokenPair> {
        info!(user_id = %credentials.user.id, "requesting access token");
        let request = self
            .http
            .post(self.config.url("/oauth/access"))
            .json(&AccessRequest::user(credentials));
        self.request_pair(request, "login").await
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        info!("refreshing access token");
        let request = self
            .http
            .post(self.config.url("/oauth/refresh"))
            .json(&RefreshRequest { refresh_token });
        self.request_pair(request, "refresh").await
    }

    async fn request_pair(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<TokenPair> {
        let issued_at = Instant::now();
        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(operation, status = status.as_u16(), "auth request rejected");
            return Err(ApiError::Auth(format!(
                "{} rejected with status {}",
                operation,
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(ApiError::Transport)?;
        let tokens: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Auth(format!("{} returned malformed body: {}", operation, e)))?;

        let expires_in = tokens
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(self.config.default_token_ttl);
        debug!(operation, expires_in_secs = expires_in.as_secs(), "token pair issued");

        Ok(TokenPair {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            issued_at,
            expires_in: Some(expires_in),
        })
    }
}
