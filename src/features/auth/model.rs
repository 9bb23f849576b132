use std::fmt;

/// Bearer credential presented by the mobile client.
///
/// It is forwarded verbatim to the upstream case API, which owns token
/// issuance and validation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let token = value.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        Some(Self::new(token))
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Never print the token itself.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}
