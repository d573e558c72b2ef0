//! Simulated sign-in.
//!
//! There are no accounts. Sign-in checks the form is filled in sensibly,
//! waits the configured delay as if a server were being consulted, and
//! hands back an identity made from the email address.

use std::time::Duration;

use premium_tech_core::{Email, EmailError, Identity, Notification};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during sign-in or sign-up.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password left blank.
    #[error("password is required")]
    MissingPassword,

    /// Sign-up without the confirmation field.
    #[error("password confirmation is required")]
    MissingConfirmation,

    /// Sign-up confirmation does not match.
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Which form the auth page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Notification shown once the shopper is through.
    #[must_use]
    pub fn welcome(self) -> Notification {
        match self {
            Self::SignIn => Notification::signed_in(),
            Self::SignUp => Notification::account_created(),
        }
    }
}

/// Submitted auth form.
#[derive(Debug, Deserialize)]
#[serde(from = "CredentialsForm")]
pub struct Credentials {
    pub mode: AuthMode,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: Option<SecretString>,
}

#[derive(Deserialize)]
struct CredentialsForm {
    #[serde(default)]
    mode: AuthMode,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: Option<String>,
}

impl From<CredentialsForm> for Credentials {
    fn from(form: CredentialsForm) -> Self {
        Self {
            mode: form.mode,
            email: form.email,
            password: SecretString::from(form.password),
            confirm_password: form.confirm_password.map(SecretString::from),
        }
    }
}

impl Credentials {
    /// Check the form and produce the shopper's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] for a malformed email, a blank password or,
    /// when signing up, a missing or mismatched confirmation.
    pub fn validate(&self) -> Result<Identity, AuthError> {
        let email = Email::parse(&self.email)?;

        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        if self.mode == AuthMode::SignUp {
            let confirm = self
                .confirm_password
                .as_ref()
                .map(|confirm| confirm.expose_secret())
                .filter(|confirm| !confirm.is_empty())
                .ok_or(AuthError::MissingConfirmation)?;
            if confirm != password {
                return Err(AuthError::PasswordMismatch);
            }
        }

        Ok(Identity::from(email))
    }
}

/// Validate credentials, then wait out the simulated round trip.
///
/// The wait is not cancellable once started.
///
/// # Errors
///
/// Returns [`AuthError`] from [`Credentials::validate`] without waiting.
pub async fn sign_in(credentials: &Credentials, delay: Duration) -> Result<Identity, AuthError> {
    let identity = credentials.validate()?;
    tokio::time::sleep(delay).await;
    Ok(identity)
}
