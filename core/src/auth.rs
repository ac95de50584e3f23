//! Credentials and the `Authorization` header they produce.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Optional credentials for a single request.
///
/// Empty strings count as absent. A bearer token wins over basic auth when
/// both are present; basic auth needs both a username and a password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            token: None,
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Value for the `Authorization` header, if any credential applies.
    pub fn authorization(&self) -> Option<String> {
        if let Some(token) = non_empty(&self.token) {
            return Some(format!("Bearer {token}"));
        }
        match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(user), Some(pass)) => {
                Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
            }
            _ => None,
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
