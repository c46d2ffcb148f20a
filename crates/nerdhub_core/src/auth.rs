use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Claims as an identity provider hands them over (OIDC names first,
/// legacy local names as fallbacks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentityClaims {
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "emailHash")]
    pub email_hash: Option<String>,
}

/// Normalized profile shown to the rest of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

impl UserProfile {
    pub fn from_claims(claims: &IdentityClaims) -> Self {
        let email = claims.email.clone().unwrap_or_default();
        let avatar = claims
            .avatar
            .clone()
            .unwrap_or_else(|| gravatar_url(claims.email_hash.as_deref(), &email));
        Self {
            username: first_present(&[&claims.preferred_username, &claims.username])
                .unwrap_or("Unknown")
                .to_string(),
            first_name: first_present(&[&claims.given_name, &claims.first_name])
                .unwrap_or_default()
                .to_string(),
            last_name: first_present(&[&claims.family_name, &claims.last_name])
                .unwrap_or_default()
                .to_string(),
            email,
            avatar,
        }
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| (*c).as_deref())
        .find(|value| !value.is_empty())
}

/// Identicon URL. Gravatar accepts SHA-256 of the normalized address when the
/// provider does not supply a hash.
fn gravatar_url(email_hash: Option<&str>, email: &str) -> String {
    let hash = match email_hash {
        Some(hash) => hash.to_string(),
        None if !email.trim().is_empty() => {
            let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
            digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
                use std::fmt::Write;
                let _ = write!(&mut hex, "{byte:02x}");
                hex
            })
        }
        None => String::new(),
    };
    format!("https://www.gravatar.com/avatar/{hash}?d=identicon")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Initializing,
    Anonymous,
    Authenticated(UserProfile),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Views that only make sense for a signed-in member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedPage {
    Timeline,
    Profile,
}

impl GatedPage {
    pub fn sign_in_prompt(self) -> &'static str {
        match self {
            GatedPage::Timeline => "Please sign in to view the timeline page.",
            GatedPage::Profile => "Please sign in to view your profile.",
        }
    }
}

/// `None` when the page may be shown, the prompt otherwise.
pub fn gate(page: GatedPage, auth: &AuthState) -> Option<&'static str> {
    (!auth.is_authenticated()).then(|| page.sign_in_prompt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_falls_back_in_order() {
        let claims = IdentityClaims {
            username: Some("local".to_string()),
            ..IdentityClaims::default()
        };
        assert_eq!(UserProfile::from_claims(&claims).username, "local");

        let claims = IdentityClaims {
            preferred_username: Some("oidc".to_string()),
            username: Some("local".to_string()),
            ..IdentityClaims::default()
        };
        assert_eq!(UserProfile::from_claims(&claims).username, "oidc");

        assert_eq!(
            UserProfile::from_claims(&IdentityClaims::default()).username,
            "Unknown"
        );
    }

    #[test]
    fn avatar_uses_supplied_hash_or_email_digest() {
        let claims = IdentityClaims {
            email_hash: Some("abc".to_string()),
            ..IdentityClaims::default()
        };
        assert_eq!(
            UserProfile::from_claims(&claims).avatar,
            "https://www.gravatar.com/avatar/abc?d=identicon"
        );

        let claims = IdentityClaims {
            email: Some(" Someone@Example.com ".to_string()),
            ..IdentityClaims::default()
        };
        let avatar = UserProfile::from_claims(&claims).avatar;
        let hash = avatar
            .trim_start_matches("https://www.gravatar.com/avatar/")
            .trim_end_matches("?d=identicon");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn gated_pages_require_sign_in() {
        assert_eq!(
            gate(GatedPage::Profile, &AuthState::Anonymous),
            Some("Please sign in to view your profile.")
        );
        let signed_in = AuthState::Authenticated(UserProfile::default());
        assert_eq!(gate(GatedPage::Timeline, &signed_in), None);
    }
}
