use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::password::{mint_token, verify_password};
use crate::auth::repo::IdentityStore;
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Stateless auth facade over the identity store: issues API tokens and
/// gates Basic-authenticated requests.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityStore>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        Self { identity }
    }

    /// Issue (or re-issue) the caller's API token.
    ///
    /// Issuance is idempotent: once a user holds a token it is returned
    /// unchanged on every later login. There is no expiry, rotation or
    /// revocation; a known limitation of the scheme.
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<String, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation(
                "You have to enter a valid email address and valid password",
            ));
        }

        let user = self
            .identity
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("User is not registered"))?;

        if !verify_password(password, &user.password_hash)? {
            warn!(email = %email, "token request with bad password");
            return Err(ApiError::authentication("Authentication failed"));
        }

        if let Some(existing) = self.identity.find_token(email).await? {
            return Ok(existing.token);
        }

        let token = mint_token(&user.email)?;
        let saved = self.identity.save_token(&user.email, &token).await?;
        info!(email = %user.email, "api token issued");
        Ok(saved.token)
    }

    /// The gate consulted on every Basic-authenticated request: a stored
    /// token must exist for the email and match exactly. Unknown email and
    /// wrong token are indistinguishable to the caller.
    pub async fn verify_token(&self, email: &str, token: &str) -> Result<bool, ApiError> {
        let stored = self.identity.find_token(email).await?;
        Ok(stored.is_some_and(|t| t.token == token))
    }
}
