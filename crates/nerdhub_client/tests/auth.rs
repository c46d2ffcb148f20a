use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nerdhub_client::{
    AnonymousProvider, AuthContext, AuthError, ClaimsFileProvider, IdentityProvider, StateFile,
};
use nerdhub_core::{AuthState, IdentityClaims};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Default)]
struct FakeProvider {
    session: Mutex<Option<IdentityClaims>>,
    fail_login: bool,
    fail_logout: bool,
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn restore(&self) -> Result<Option<IdentityClaims>, AuthError> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn login(&self) -> Result<IdentityClaims, AuthError> {
        if self.fail_login {
            return Err(AuthError::NotConfigured);
        }
        let claims = IdentityClaims {
            preferred_username: Some("gaben".into()),
            email: Some("gaben@example.com".into()),
            given_name: Some("Gabe".into()),
            ..IdentityClaims::default()
        };
        *self.session.lock().unwrap() = Some(claims.clone());
        Ok(claims)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        *self.session.lock().unwrap() = None;
        if self.fail_logout {
            return Err(AuthError::NotConfigured);
        }
        Ok(())
    }
}

#[tokio::test]
async fn lifecycle_moves_through_every_state() {
    let mut auth = AuthContext::new(Arc::new(FakeProvider::default()));
    assert_eq!(auth.state(), &AuthState::Initializing);

    assert_eq!(auth.initialize().await, &AuthState::Anonymous);

    let profile = auth.login().await.expect("login ok");
    assert_eq!(profile.username, "gaben");
    assert_eq!(profile.first_name, "Gabe");
    assert!(auth.is_authenticated());
    assert_eq!(auth.user(), Some(&profile));

    auth.logout().await.expect("logout ok");
    assert_eq!(auth.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn failed_login_keeps_previous_state() {
    let provider = FakeProvider {
        fail_login: true,
        ..FakeProvider::default()
    };
    let mut auth = AuthContext::new(Arc::new(provider));
    auth.initialize().await;

    assert!(auth.login().await.is_err());
    assert_eq!(auth.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn failed_logout_still_signs_out_locally() {
    let provider = FakeProvider {
        fail_logout: true,
        ..FakeProvider::default()
    };
    let mut auth = AuthContext::new(Arc::new(provider));
    auth.login().await.expect("login ok");

    assert!(auth.logout().await.is_err());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn anonymous_provider_cannot_sign_in() {
    let mut auth = AuthContext::new(Arc::new(AnonymousProvider));
    auth.initialize().await;
    assert!(matches!(auth.login().await, Err(AuthError::NotConfigured)));
    assert_eq!(auth.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn claims_file_session_survives_restart() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("claims.json");
    fs::write(
        &source,
        r#"{"username": "robin", "firstName": "Robin", "email": " Robin@Example.com "}"#,
    )
    .unwrap();
    let session = StateFile::new(temp.path().join("state").join(".nerdhub_identity.json"));

    let provider = ClaimsFileProvider::new(session.clone()).with_source(&source);
    let mut auth = AuthContext::new(Arc::new(provider));
    let profile = auth.login().await.expect("login ok");
    assert_eq!(profile.username, "robin");
    assert!(session.path().exists());

    let mut restarted = AuthContext::new(Arc::new(ClaimsFileProvider::new(session.clone())));
    restarted.initialize().await;
    assert_eq!(restarted.user(), Some(&profile));

    restarted.logout().await.expect("logout ok");
    assert!(!session.path().exists());
}

#[tokio::test]
async fn corrupt_session_restores_as_anonymous() {
    let temp = TempDir::new().unwrap();
    let session = StateFile::new(temp.path().join(".nerdhub_identity.json"));
    session.write("{not json").unwrap();

    let mut auth = AuthContext::new(Arc::new(ClaimsFileProvider::new(session)));
    assert_eq!(auth.initialize().await, &AuthState::Anonymous);
}

#[tokio::test]
async fn login_rejects_malformed_claims() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("claims.json");
    fs::write(&source, r#"{"email": 5}"#).unwrap();
    let session = StateFile::new(temp.path().join(".nerdhub_identity.json"));

    let provider = ClaimsFileProvider::new(session.clone()).with_source(&source);
    let mut auth = AuthContext::new(Arc::new(provider));
    assert!(matches!(
        auth.login().await,
        Err(AuthError::InvalidClaims(_))
    ));
    assert!(!session.path().exists());
}
