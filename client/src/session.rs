//! Session lifecycle: token custody, bootstrap, login and transparent
//! renewal.
//!
//! The session is an explicit object with a defined lifecycle rather than
//! module-level globals, so several sessions can coexist without
//! cross-contamination and tests can drive one in isolation. Concurrent
//! callers that each discover an expired access token are collapsed into a
//! single in-flight refresh; see [`SessionClient::refresh`].

use crate::api::{ApiClientError, AuthApi, Principal, TokenPair};
use crate::store::{StoreError, StoredTokens, TokenStore};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Default)]
struct SessionState {
    tokens: Option<TokenPair>,
    principal: Option<Principal>,
    /// Bumped on every rotation or clearing of the pair. A refresh caller
    /// that finds the generation changed while it waited knows another
    /// caller already resolved the refresh for it.
    generation: u64,
}

/// Client-side custody of the active token pair.
pub struct SessionClient<A: AuthApi> {
    api: A,
    store: Box<dyn TokenStore>,
    state: Mutex<SessionState>,
    refresh_gate: AsyncMutex<()>,
}

impl<A: AuthApi> SessionClient<A> {
    pub fn new(api: A, store: Box<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: Mutex::new(SessionState::default()),
            refresh_gate: AsyncMutex::new(()),
        }
    }

    /// Restores the session from durable storage.
    ///
    /// Loads the persisted pair and fetches the profile with it. A failed
    /// profile fetch triggers exactly one `refresh()` and one retry; a
    /// second failure clears everything and the session is anonymous. This
    /// never loops further.
    pub async fn bootstrap(&self) -> Result<Option<Principal>, SessionError> {
        let Some(stored) = self.store.load()? else {
            return Ok(None);
        };

        let access_token = stored.access_token.clone();
        {
            let mut state = self.state();
            state.tokens = Some(TokenPair {
                access_token: stored.access_token,
                refresh_token: stored.refresh_token,
            });
            state.generation += 1;
        }

        match self.api.fetch_profile(&access_token).await {
            Ok(principal) => {
                self.state().principal = Some(principal.clone());
                Ok(Some(principal))
            }
            Err(error) => {
                tracing::debug!("Profile fetch failed at bootstrap, refreshing once: {error}");

                let Some(fresh_access) = self.refresh().await else {
                    return Ok(None);
                };

                match self.api.fetch_profile(&fresh_access).await {
                    Ok(principal) => {
                        self.state().principal = Some(principal.clone());
                        Ok(Some(principal))
                    }
                    Err(error) => {
                        tracing::debug!("Profile fetch failed after refresh: {error}");
                        self.clear_session();
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Authenticates a credential pair and installs the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, SessionError> {
        let response = self.api.login(email, password).await?;

        self.store.save(&StoredTokens {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone(),
        })?;

        let mut state = self.state();
        state.tokens = Some(TokenPair {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        });
        state.principal = Some(response.user.clone());
        state.generation += 1;

        Ok(response.user)
    }

    /// Rotates the token pair, returning the fresh access token.
    ///
    /// At most one refresh is in flight at a time: callers serialize on an
    /// async mutex, and a caller that acquires it after another caller
    /// already rotated the pair returns the fresh token without a second
    /// network call. On failure the whole session is cleared (forcing
    /// re-authentication) and `None` is returned; there is no internal
    /// retry.
    pub async fn refresh(&self) -> Option<String> {
        let (observed_generation, refresh_token) = {
            let state = self.state();
            let tokens = state.tokens.as_ref()?;
            (state.generation, tokens.refresh_token.clone())
        };

        let _gate = self.refresh_gate.lock().await;

        {
            let state = self.state();
            if state.generation != observed_generation {
                // Another caller resolved the refresh while this one waited.
                return state.tokens.as_ref().map(|pair| pair.access_token.clone());
            }
        }

        match self.api.refresh(&refresh_token).await {
            Ok(pair) => {
                if let Err(error) = self.store.save(&StoredTokens {
                    access_token: pair.access_token.clone(),
                    refresh_token: pair.refresh_token.clone(),
                }) {
                    tracing::warn!("Failed to persist refreshed tokens: {error}");
                }

                let mut state = self.state();
                state.tokens = Some(pair.clone());
                state.generation += 1;

                Some(pair.access_token)
            }
            Err(error) => {
                tracing::warn!("Token refresh failed, clearing session: {error}");
                self.clear_session();
                None
            }
        }
    }

    /// Best-effort server-side invalidation, then unconditional local
    /// clearing. A failed server call never keeps the session alive.
    pub async fn logout(&self) {
        if let Err(error) = self.api.logout().await {
            tracing::warn!("Server-side logout failed: {error}");
        }

        self.clear_session();
    }

    /// Synchronous accessor, no side effects.
    pub fn current_access_token(&self) -> Option<String> {
        self.state()
            .tokens
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    /// The principal recorded at login/bootstrap, if any.
    pub fn current_principal(&self) -> Option<Principal> {
        self.state().principal.clone()
    }

    fn clear_session(&self) {
        if let Err(error) = self.store.clear() {
            tracing::warn!("Failed to clear persisted tokens: {error}");
        }

        let mut state = self.state();
        state.tokens = None;
        state.principal = None;
        state.generation += 1;
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
