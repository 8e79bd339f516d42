//! Credential and identity value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer string proving an authenticated session to the API.
///
/// Never empty. `Debug` prints only the length so credentials stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token, trimming surrounding whitespace.
    /// Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

/// The authenticated supplier, as decoded server-side from the credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    /// Login username; suppliers register with an email address.
    pub email: String,
    pub phone: String,
    pub verified: bool,
}

#[cfg(test)]
#[path = "credential_test.rs"]
mod tests;
