use std::path::PathBuf;
use std::sync::Arc;

use hub_logging::{hub_info, hub_warn};
use nerdhub_core::{AuthState, IdentityClaims, UserProfile};
use thiserror::Error;

use crate::{PersistError, StateFile};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no identity provider is configured")]
    NotConfigured,
    #[error("invalid identity claims: {0}")]
    InvalidClaims(#[from] serde_json::Error),
    #[error("cannot read claims from {path}: {source}")]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Where signed-in identities come from.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity of an existing session, if any.
    async fn restore(&self) -> Result<Option<IdentityClaims>, AuthError>;
    async fn login(&self) -> Result<IdentityClaims, AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
}

/// Provider for deployments without sign-in.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousProvider;

#[async_trait::async_trait]
impl IdentityProvider for AnonymousProvider {
    async fn restore(&self) -> Result<Option<IdentityClaims>, AuthError> {
        Ok(None)
    }

    async fn login(&self) -> Result<IdentityClaims, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Keeps the session as a JSON claims document on disk.
///
/// `login` validates the claims at `source` and copies them into the session
/// file; without a source it fails with [`AuthError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct ClaimsFileProvider {
    session: StateFile,
    source: Option<PathBuf>,
}

impl ClaimsFileProvider {
    pub fn new(session: StateFile) -> Self {
        Self {
            session,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ClaimsFileProvider {
    async fn restore(&self) -> Result<Option<IdentityClaims>, AuthError> {
        match self.session.read()? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    async fn login(&self) -> Result<IdentityClaims, AuthError> {
        let source = self.source.as_ref().ok_or(AuthError::NotConfigured)?;
        let content = std::fs::read_to_string(source).map_err(|err| AuthError::Source {
            path: source.clone(),
            source: err,
        })?;
        let claims: IdentityClaims = serde_json::from_str(&content)?;
        self.session.write(&serde_json::to_string_pretty(&claims)?)?;
        Ok(claims)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.session.remove()?;
        Ok(())
    }
}

/// Signed-in state handed to the views that need it.
pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    state: AuthState,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            state: AuthState::Initializing,
        }
    }

    /// Resolves `Initializing` into `Anonymous` or `Authenticated`. A broken
    /// session is treated as signed out.
    pub async fn initialize(&mut self) -> &AuthState {
        self.state = match self.provider.restore().await {
            Ok(Some(claims)) => AuthState::Authenticated(UserProfile::from_claims(&claims)),
            Ok(None) => AuthState::Anonymous,
            Err(err) => {
                hub_warn!("Could not restore session: {}", err);
                AuthState::Anonymous
            }
        };
        &self.state
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user()
    }

    /// On failure the previous state is kept.
    pub async fn login(&mut self) -> Result<UserProfile, AuthError> {
        match self.provider.login().await {
            Ok(claims) => {
                let profile = UserProfile::from_claims(&claims);
                hub_info!("Signed in as {}", profile.username);
                self.state = AuthState::Authenticated(profile.clone());
                Ok(profile)
            }
            Err(err) => {
                hub_warn!("Login failed: {}", err);
                Err(err)
            }
        }
    }

    /// Always signs out locally, even if the provider fails.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        self.state = AuthState::Anonymous;
        self.provider.logout().await.map_err(|err| {
            hub_warn!("Logout failed: {}", err);
            err
        })
    }
}
