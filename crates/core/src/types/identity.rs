//! Opaque shopper identity.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Email;

/// Error returned when an identity handle is blank.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("identity cannot be blank")]
pub struct IdentityError;

/// The handle a signed-in shopper is known by.
///
/// Nothing is authenticated: the handle is whatever the shopper signed in
/// with, and its presence is all that protected pages check for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a handle, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if the handle is empty after trimming.
    pub fn new(handle: &str) -> Result<Self, IdentityError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(IdentityError);
        }
        Ok(Self(handle.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Email> for Identity {
    fn from(email: Email) -> Self {
        Self(email.into_inner())
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identity_rejected() {
        assert_eq!(Identity::new(""), Err(IdentityError));
        assert_eq!(Identity::new(" \t "), Err(IdentityError));
    }

    #[test]
    fn test_identity_from_email() {
        let email = Email::parse("shopper@example.com").unwrap();
        let identity = Identity::from(email);
        assert_eq!(identity.as_str(), "shopper@example.com");
    }

    #[test]
    fn test_blank_identity_fails_to_deserialize() {
        assert!(serde_json::from_str::<Identity>("\"  \"").is_err());
        let identity: Identity = serde_json::from_str("\"ada\"").unwrap();
        assert_eq!(identity.to_string(), "ada");
    }
}
